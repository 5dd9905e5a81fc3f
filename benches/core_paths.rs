//! Microbenchmarks for the hot synchronization paths: subtitle parsing on
//! import and per-tick chapter lookup.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prismplayer::chapters::ChapterIndex;
use prismplayer::media::Chapter;
use prismplayer::subtitles;

fn synth_srt(cues: usize) -> String {
    let mut out = String::new();
    for i in 0..cues {
        let start = i as f64 * 3.0;
        let end = start + 2.5;
        out.push_str(&format!(
            "{}\n00:{:02}:{:02},{:03} --> 00:{:02}:{:02},{:03}\nCue number {} with <i>markup</i>\n\n",
            i + 1,
            (start as u64) / 60,
            (start as u64) % 60,
            ((start * 1000.0) as u64) % 1000,
            (end as u64) / 60,
            (end as u64) % 60,
            ((end * 1000.0) as u64) % 1000,
            i + 1,
        ));
    }
    out
}

fn bench_subtitle_parse(c: &mut Criterion) {
    let small = synth_srt(50);
    let large = synth_srt(2000);

    c.bench_function("parse_srt_50_cues", |b| {
        b.iter(|| subtitles::parse(black_box(&small)))
    });
    c.bench_function("parse_srt_2000_cues", |b| {
        b.iter(|| subtitles::parse(black_box(&large)))
    });
}

fn bench_chapter_lookup(c: &mut Criterion) {
    let chapters: Vec<Chapter> = (0..500)
        .map(|i| Chapter::new(format!("Chapter {}", i), i as f64 * 30.0))
        .collect();
    let mut index = ChapterIndex::new(chapters);
    index.set_duration(500.0 * 30.0);

    c.bench_function("current_chapter_lookup", |b| {
        b.iter(|| index.current(black_box(7321.0)))
    });
    c.bench_function("previous_target_lookup", |b| {
        b.iter(|| index.previous_target(black_box(7321.0)))
    });
}

criterion_group!(benches, bench_subtitle_parse, bench_chapter_lookup);
criterion_main!(benches);
