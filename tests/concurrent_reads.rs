use std::sync::Arc;
use std::thread;

use ukmec::{Category, Intent, Method, ReferenceTable, Resolver, Selection};

const THREADS: usize = 4;

fn selections(table: &ReferenceTable) -> Vec<Selection> {
    let ids: Vec<String> = table.conditions().map(|c| c.id.to_string()).collect();
    let mut out = Vec::new();
    for method in Method::ALL {
        for intent in Intent::ALL {
            for chunk in ids.chunks(7) {
                out.push(
                    Selection::builder()
                        .method(method)
                        .intent(intent)
                        .conditions(chunk.iter().cloned())
                        .build()
                        .unwrap(),
                );
            }
        }
    }
    out
}

#[test]
fn shared_table_resolves_identically_across_threads() {
    let table = Arc::new(ReferenceTable::builtin().unwrap());
    let resolver = Resolver::new(Arc::clone(&table));
    let selections = selections(&table);

    let expected: Vec<Category> = selections.iter().map(|s| resolver.resolve(s)).collect();

    let results: Vec<Vec<Category>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let resolver = resolver.clone();
                let selections = &selections;
                scope.spawn(move || selections.iter().map(|s| resolver.resolve(s)).collect())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.len(), THREADS);
    for result in results {
        assert_eq!(result, expected);
    }
    assert_eq!(Arc::strong_count(&table), 2);
}
