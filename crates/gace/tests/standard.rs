use gace::prelude::*;

#[test]
fn standard_resolver_knows_every_builtin() {
    let resolver = gace::standard_resolver();
    assert_eq!(resolver.list_identifiers().count(), BUILTIN_TASKS.len());
    for id in BUILTIN_TASKS {
        assert!(resolver.catalog().contains(&id), "{id}");
    }
}

#[test]
fn standard_catalogs_are_independent() {
    let mut a = gace::standard_catalog();
    let b = gace::standard_catalog();
    // Re-registering into a populated catalog fails and leaves it intact.
    assert!(register_builtins(&mut a).is_err());
    assert_eq!(a.len(), b.len());
}

#[test]
fn electrical_and_geometrical_tasks_share_metrics() {
    let resolver = gace::standard_resolver();
    let v0 = resolver.create("op5-xh035-v0", &Overrides::new()).unwrap();
    let v1 = resolver.create("op5-xh035-v1", &Overrides::new()).unwrap();
    let perf = |env: &dyn Environment| {
        env.observation_space()
            .dims()
            .iter()
            .filter(|d| d.kind == gace::types::DimensionKind::Performance)
            .map(|d| d.name.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(perf(v0.as_ref()), perf(v1.as_ref()));
}
