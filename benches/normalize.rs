// Normalizer benchmarks
//
// Run with: cargo bench --bench normalize

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use farm_assistant::normalize;

const CLEAN_REPLY: &str = r#"```json
{"plantName":"Tomato","scientificName":"Solanum lycopersicum","family":"Solanaceae","isHealthy":false,"confidence":88,
 "diseases":[{"name":"Early Blight","probability":76,"description":"Fungal disease causing concentric rings on older leaves",
   "symptoms":["Brown spots","Yellow halo","Leaf drop","Stem lesions"],"causes":["Alternaria solani","Humidity"],
   "treatment":{"organic":["Neem oil","Copper spray"],"chemical":["Mancozeb"]},"prevention":["Crop rotation","Mulch"]}],
 "plantDetails":{"commonNames":["Tamatar"],"description":"Annual fruiting vegetable","careInstructions":["Stake plants","Water at base"]}}
```"#;

fn normalize_benchmarks(c: &mut Criterion) {
    c.bench_function("normalize clean fenced reply", |b| {
        b.iter(|| normalize(black_box(CLEAN_REPLY)))
    });

    let truncated = &CLEAN_REPLY[..CLEAN_REPLY.len() / 2];
    c.bench_function("normalize truncated reply", |b| {
        b.iter(|| normalize(black_box(truncated)))
    });

    c.bench_function("normalize prose reply", |b| {
        b.iter(|| normalize(black_box("I could not find a plant in this photo, please retake it.")))
    });
}

criterion_group!(benches, normalize_benchmarks);
criterion_main!(benches);
