use common::EntityId;
use criterion::{Criterion, criterion_group, criterion_main};
use record_store::{JsonFileCollection, MemoryCollection, RecordTable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Item {
    id: EntityId,
    label: String,
    quantity: i64,
}

impl record_store::Record for Item {
    fn record_id(&self) -> EntityId {
        self.id
    }
}

fn make_item(n: i64) -> Item {
    Item {
        id: EntityId::new(),
        label: format!("item-{n}"),
        quantity: n,
    }
}

fn populated_table(count: i64) -> (RecordTable<MemoryCollection<Item>>, Vec<EntityId>) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let table = RecordTable::new(MemoryCollection::new());
    let ids = rt.block_on(async {
        let mut ids = Vec::new();
        for n in 0..count {
            ids.push(table.create(make_item(n)).await.unwrap().id);
        }
        ids
    });
    (table, ids)
}

fn bench_create_empty(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("record_store/create_into_empty", |b| {
        b.iter(|| {
            rt.block_on(async {
                let table = RecordTable::new(MemoryCollection::new());
                table.create(make_item(0)).await.unwrap();
            });
        });
    });
}

fn bench_create_populated(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (table, _) = populated_table(100);

    c.bench_function("record_store/create_into_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                table.create(make_item(100)).await.unwrap();
            });
        });
    });
}

fn bench_find_by_id(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (table, ids) = populated_table(100);
    let target = ids[50];

    c.bench_function("record_store/find_by_id_in_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                table.find_by_id(target).await.unwrap().unwrap();
            });
        });
    });
}

fn bench_update_with(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (table, ids) = populated_table(100);
    let target = ids[50];

    c.bench_function("record_store/update_in_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                table
                    .update_with(target, |item| item.quantity += 1)
                    .await
                    .unwrap()
                    .unwrap();
            });
        });
    });
}

fn bench_file_write_cycle(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let table = RecordTable::new(JsonFileCollection::new(dir.path().join("items.json")));

    rt.block_on(async {
        for n in 0..100 {
            table.create(make_item(n)).await.unwrap();
        }
    });

    c.bench_function("record_store/file_create_into_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                table.create(make_item(100)).await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_create_empty,
    bench_create_populated,
    bench_find_by_id,
    bench_update_with,
    bench_file_write_cycle,
);
criterion_main!(benches);
