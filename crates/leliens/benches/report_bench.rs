use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};
use leliens::{build_link_intel_report_with, EngineOptions};
use leregistre::{ContentEntry, Locale, PageType, RecommendationConfig, Registry};

const PILLARS: [&str; 6] = ["sleep", "focus", "breathing", "anxiety", "mood", "energy"];
const WORDS: [&str; 12] = [
    "routine", "calm", "timer", "evening", "morning", "habit", "rest", "attention", "stress",
    "journal", "rhythm", "sound",
];

fn synthetic_registry(pages: usize) -> Registry {
    let mut entries = Vec::with_capacity(pages);
    for (p, pillar) in PILLARS.iter().enumerate() {
        entries.push(
            ContentEntry::new(
                format!("/uk/{pillar}"),
                PageType::Pillar,
                Locale::Uk,
                format!("{pillar} guide"),
            )
            .with_pillar(*pillar)
            .with_description(format!("Everything about {pillar} and {}", WORDS[p])),
        );
    }

    let mut i = 0;
    while entries.len() < pages {
        let pillar = PILLARS[i % PILLARS.len()];
        let (page_type, locale) = match i % 10 {
            0 => (PageType::Tool, Locale::Global),
            1 => (PageType::Trust, Locale::Global),
            2 => (PageType::Cluster, Locale::Us),
            _ => (PageType::Cluster, Locale::Uk),
        };
        let title = format!(
            "{} {} {}",
            WORDS[i % WORDS.len()],
            pillar,
            WORDS[(i * 7 + 3) % WORDS.len()]
        );
        let entry = ContentEntry::new(format!("/page-{i}"), page_type, locale, title)
            .with_description(format!("A page about {} for {pillar}", WORDS[(i * 5) % WORDS.len()]))
            .with_tags([WORDS[(i * 3) % WORDS.len()]]);
        entries.push(if page_type == PageType::Cluster {
            entry.with_pillar(pillar)
        } else {
            entry
        });
        i += 1;
    }

    Registry::new(entries).expect("synthetic registry")
}

fn bench_report(c: &mut Criterion) {
    let registry = synthetic_registry(500);
    let config = RecommendationConfig::default();

    c.bench_function("report_500_sequential", |b| {
        b.iter(|| {
            build_link_intel_report_with(
                &registry,
                &config,
                EngineOptions { parallel: false },
                Utc::now(),
            )
        });
    });

    c.bench_function("report_500_parallel", |b| {
        b.iter(|| {
            build_link_intel_report_with(
                &registry,
                &config,
                EngineOptions { parallel: true },
                Utc::now(),
            )
        });
    });
}

criterion_group!(benches, bench_report);
criterion_main!(benches);
