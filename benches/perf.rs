use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use fbref_harvest::extract::{MatchTableSelector, parse_season_team};
use fbref_harvest::merge::concat_tables;
use fbref_harvest::squads::{TeamEntry, parse_squad_links};
use fbref_harvest::table::parse_tables;

const SQUAD_PAGE: &str = include_str!("../tests/fixtures/squad_page.html");
const LEAGUE_INDEX: &str = include_str!("../tests/fixtures/league_index.html");

fn bench_parse_tables(c: &mut Criterion) {
    c.bench_function("parse_tables", |b| {
        b.iter(|| {
            let tables = parse_tables(black_box(SQUAD_PAGE));
            black_box(tables.len());
        })
    });
}

fn bench_season_team(c: &mut Criterion) {
    let team = TeamEntry::new("Atletico Madrid", "db3b9613");
    c.bench_function("parse_season_team", |b| {
        b.iter(|| {
            let tables = parse_season_team(
                black_box(SQUAD_PAGE),
                2023,
                &team,
                "La Liga",
                MatchTableSelector::DatePattern,
            )
            .unwrap();
            black_box(tables.matches.len());
        })
    });
}

fn bench_squad_links(c: &mut Criterion) {
    c.bench_function("parse_squad_links", |b| {
        b.iter(|| black_box(parse_squad_links(black_box(LEAGUE_INDEX)).len()))
    });
}

fn bench_concat(c: &mut Criterion) {
    let tables = parse_tables(SQUAD_PAGE);
    let many = (0..200)
        .flat_map(|_| tables.iter().cloned())
        .collect::<Vec<_>>();
    c.bench_function("concat_tables", |b| {
        b.iter(|| black_box(concat_tables(black_box(&many)).len()))
    });
}

criterion_group!(
    benches,
    bench_parse_tables,
    bench_season_team,
    bench_squad_links,
    bench_concat
);
criterion_main!(benches);
