use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::sync::Arc;

use serde_json::Map;

use carelink_core::OrganizationId;
use carelink_events::InMemoryEventBus;
use carelink_infra::composition::{self, InMemoryComposition};
use carelink_partnerships::{Organization, OrganizationAttributes, PartnerAttributes};

fn seeded(partners: usize) -> (InMemoryComposition, OrganizationId, Vec<OrganizationId>) {
    let app = composition::in_memory(Arc::new(InMemoryEventBus::new()));
    let inviter = Organization {
        id: OrganizationId::new(),
        name: "Inviter".to_string(),
        email_address: "inviter@example.com".to_string(),
        attributes: Map::new(),
    };
    app.organizations
        .upsert(inviter.clone())
        .expect("seed inviter");

    let ids = (0..partners)
        .map(|i| {
            let partner = Organization {
                id: OrganizationId::new(),
                name: format!("Partner {i}"),
                email_address: format!("partner{i}@example.com"),
                attributes: Map::new(),
            };
            let id = partner.id;
            app.organizations.upsert(partner).expect("seed partner");
            id
        })
        .collect();

    (app, inviter.id, ids)
}

fn bench_link_existing(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime");
    let mut group = c.benchmark_group("link_existing_batch");

    for size in [1usize, 10, 100] {
        let (app, inviter, ids) = seeded(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ids, |b, ids| {
            b.iter(|| {
                let partners = runtime
                    .block_on(app.orchestrator.create_partner(inviter, vec![], Some(ids.clone())))
                    .expect("batch succeeds");
                black_box(partners)
            })
        });
    }

    group.finish();
}

fn bench_create_new(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime");
    let mut group = c.benchmark_group("create_new_batch");

    for size in [1usize, 10, 100] {
        let (app, inviter, _) = seeded(0);
        let attrs: Vec<_> = (0..size)
            .map(|i| {
                PartnerAttributes::new(
                    OrganizationAttributes::new(format!("Clinic {i}"), format!("clinic{i}@example.com")),
                    vec!["cardiology".to_string()],
                )
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &attrs, |b, attrs| {
            b.iter(|| {
                let partners = runtime
                    .block_on(app.orchestrator.create_partner(inviter, attrs.clone(), None))
                    .expect("batch succeeds");
                black_box(partners)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_link_existing, bench_create_new);
criterion_main!(benches);
