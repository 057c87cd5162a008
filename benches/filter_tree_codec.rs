//! Filter-tree codec benchmarks
//!
//! Measures decode over envelope-shaped and bare-shaped trees, and encode of
//! member lists, at the group sizes seen for permission groups.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use sf_provisioning::filter_tree::{decode, encode};
use sf_provisioning::membership::{GroupId, MemberId, MemberList};

const GROUP_SIZES: [usize; 4] = [1, 10, 100, 1000];

fn members(count: usize) -> MemberList {
    (0..count)
        .map(|i| MemberId::new(format!("user{i:05}")).unwrap())
        .collect()
}

fn envelope_tree(count: usize) -> Value {
    let group_id = GroupId::new("4521").unwrap();
    encode(&group_id, "Admins", &members(count))
        .to_value()
        .unwrap()
}

fn bare_tree(count: usize) -> Value {
    let pools: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "filters": {
                    "name": "username",
                    "expressions": {
                        "operator": "equals",
                        "values": { "fieldValue": format!("user{i:05}") }
                    }
                }
            })
        })
        .collect();
    json!({ "groupID": "4521", "groupName": "Admins", "dgIncludePools": pools })
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for size in GROUP_SIZES {
        group.throughput(Throughput::Elements(size as u64));

        let envelope = envelope_tree(size);
        group.bench_with_input(BenchmarkId::new("envelope", size), &envelope, |b, tree| {
            b.iter(|| decode(black_box(tree)).unwrap())
        });

        let bare = bare_tree(size);
        group.bench_with_input(BenchmarkId::new("bare", size), &bare, |b, tree| {
            b.iter(|| decode(black_box(tree)).unwrap())
        });
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let group_id = GroupId::new("4521").unwrap();
    let mut group = c.benchmark_group("encode");
    for size in GROUP_SIZES {
        group.throughput(Throughput::Elements(size as u64));
        let list = members(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &list, |b, list| {
            b.iter(|| encode(&group_id, "Admins", black_box(list)).to_value().unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
