// benches/render.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use chrono::{FixedOffset, TimeZone, Utc};
use fan_tracker::chart::draw_chart;
use fan_tracker::series::parse_series;

/// A week of five-minute samples in the current three-column layout.
fn synthetic_series(rows: usize) -> String {
    let offset = FixedOffset::east_opt(8 * 3600).unwrap();
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let mut text = String::from("ts_utc,ts_cn,fans\n");
    for i in 0..rows {
        let at = t0 + chrono::Duration::minutes(5 * i as i64);
        let fans = 100_000 + (i as u64 * 37) % 500 + i as u64 / 3;
        text.push_str(&format!(
            "{},{},{}\n",
            at.to_rfc3339(),
            at.with_timezone(&offset).format("%Y/%m/%d %H:%M:%S"),
            fans
        ));
    }
    text
}

fn bench_render(c: &mut Criterion) {
    let text = synthetic_series(7 * 24 * 12);
    let offset = FixedOffset::east_opt(8 * 3600).unwrap();

    c.bench_function("parse_series_week", |b| {
        b.iter(|| {
            let (_, rows) = parse_series(black_box(&text)).unwrap();
            black_box(rows.len())
        })
    });

    let (_, rows) = parse_series(&text).unwrap();
    c.bench_function("draw_chart_week", |b| {
        b.iter(|| {
            let img = draw_chart(63231, black_box(&rows), offset);
            black_box(img.len())
        })
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
