use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::NaiveDate;
use osbill_catalog::{Product, ProductCategory};
use osbill_core::{PartnerId, ProjectId};
use osbill_invoicing::{Invoice, InvoiceLine, OutstandingInvoices};
use osbill_projects::{PartnerRef, ProjectRef};
use rust_decimal::Decimal;

const REGIONS: [&str; 3] = ["nz-hlz-1", "nz-por-1", "nz_wlg_2"];
const CATEGORIES: [&str; 4] = ["Compute", "Block Storage", "Object Storage", "Network"];

fn usage_invoice(lines: usize) -> Invoice {
    let partner = PartnerRef {
        id: PartnerId::new(),
        name: "Acme Ltd".to_string(),
    };
    let project = ProjectRef {
        id: ProjectId::new(),
        name: "acme-prod".to_string(),
        os_id: "0f5e6a".to_string(),
    };
    let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap_or_default();
    let mut invoice = Invoice::new("INV/2024/0001", partner, date, date).with_project(project.clone());

    for i in 0..lines {
        let category = ProductCategory::new(CATEGORIES[i % CATEGORIES.len()])
            .with_parent(ProductCategory::new(REGIONS[i % REGIONS.len()]));
        let product = Product::new(format!("product-{i}")).with_category(category);
        // Every tenth line is a credit.
        let price = if i % 10 == 0 { Decimal::new(-250, 2) } else { Decimal::new(44, 3) };
        invoice = invoice.with_line(
            InvoiceLine::new(format!("line {i}"), product, Decimal::from(720), price)
                .with_project(project.clone()),
        );
    }
    invoice.posted()
}

fn bench_categorise(c: &mut Criterion) {
    let mut group = c.benchmark_group("categorise_invoice_lines");

    for size in [10usize, 100, 1_000, 10_000] {
        let invoice = usage_invoice(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &invoice, |b, invoice| {
            b.iter(|| {
                let categorised = invoice.categorised_lines();
                black_box(categorised.total());
            });
        });
    }

    group.finish();
}

fn bench_outstanding_snapshot(c: &mut Criterion) {
    let invoices: Vec<Invoice> = (0..1_000).map(|_| usage_invoice(1)).collect();
    let today = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap_or_default();

    c.bench_function("outstanding_snapshot_1000", |b| {
        b.iter(|| {
            let snapshot = OutstandingInvoices::collect(black_box(&invoices), today);
            black_box(snapshot.grand_total());
        });
    });
}

criterion_group!(benches, bench_categorise, bench_outstanding_snapshot);
criterion_main!(benches);
