use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use tillpoint_catalog::{CatalogQuery, DEFAULT_SIMILARITY_THRESHOLD, InventoryMetadataDto, filter_items};
use tillpoint_core::{Money, StockId};

const BRANDS: [&str; 4] = ["Acer", "Logitech", "Razer", "Asus"];
const KINDS: [&str; 4] = ["Laptop", "Mouse", "Keyboard", "Monitor"];

fn catalog(size: u64) -> Vec<InventoryMetadataDto> {
    (0..size)
        .map(|i| {
            let brand = BRANDS[(i % 4) as usize];
            let kind = KINDS[((i / 4) % 4) as usize];
            InventoryMetadataDto {
                stock_id: StockId::new(i),
                item_name: format!("{brand} {kind} Model {i}"),
                category_name: kind.to_string(),
                brand_name: brand.to_string(),
                quantity: 10,
                unit_price: Money::from_minor(1_000 + i),
                display_image: None,
            }
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_filter");

    for size in [100u64, 1_000, 10_000] {
        let items = catalog(size);
        let fuzzy = CatalogQuery::new().with_text("Razer Mouse");
        let brand_only = CatalogQuery::new().with_brand("Asus").with_category("Monitor");

        group.bench_with_input(BenchmarkId::new("fuzzy_text", size), &items, |b, items| {
            b.iter(|| filter_items(black_box(items), &fuzzy, DEFAULT_SIMILARITY_THRESHOLD).len())
        });
        group.bench_with_input(BenchmarkId::new("brand_category", size), &items, |b, items| {
            b.iter(|| filter_items(black_box(items), &brand_only, DEFAULT_SIMILARITY_THRESHOLD).len())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
