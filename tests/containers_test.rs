use strata::{AttributeType, AttributeValue, Context, Element, Handle, Status};

#[test]
fn test_list_operations() {
    let mut ctx = Context::default();
    let mut list = Handle::NULL;
    ctx.list_create(&mut list);
    ctx.list_add(list, Element::Int(3));
    ctx.list_add(list, Element::Double(1.5));
    ctx.list_add(list, Element::Int(3));
    ctx.list_add(list, Element::from("three"));

    let mut size = 0;
    ctx.list_size(list, &mut size);
    assert_eq!(size, 4);

    let mut removed = false;
    ctx.list_remove(list, &Element::Int(3), &mut removed);
    assert!(removed);
    let mut contains = false;
    ctx.list_contains(list, &Element::Int(3), &mut contains);
    assert!(contains, "only the first occurrence is removed");
    ctx.list_remove(list, &Element::Int(42), &mut removed);
    assert!(!removed);

    let mut it = Handle::NULL;
    ctx.list_it_create(list, &mut it);
    let mut d = 0.0;
    assert_eq!(ctx.it_next_double(it, &mut d), Status::Success);
    assert_eq!(d, 1.5);
    let mut i = 0;
    assert_eq!(ctx.it_next_int(it, &mut i), Status::Success);
    assert_eq!(i, 3);
    let mut s = String::new();
    assert_eq!(ctx.it_next_string(it, &mut s), Status::Success);
    assert_eq!(s, "three");

    ctx.list_clear(list);
    ctx.list_size(list, &mut size);
    assert_eq!(size, 0);
}

#[test]
fn test_iterator_type_mismatch_does_not_consume() {
    let mut ctx = Context::default();
    let mut list = Handle::NULL;
    ctx.list_create(&mut list);
    ctx.list_add(list, Element::Double(2.0));
    let mut it = Handle::NULL;
    ctx.list_it_create(list, &mut it);

    let mut i = 0;
    assert_eq!(ctx.it_next_int(it, &mut i), Status::IllegalArgument);
    let mut more = false;
    ctx.it_has_next(it, &mut more);
    assert!(more);
    let mut d = 0.0;
    assert_eq!(ctx.it_next_double(it, &mut d), Status::Success);
    assert_eq!(d, 2.0);
    ctx.it_has_next(it, &mut more);
    assert!(!more);
    assert_eq!(ctx.it_next_double(it, &mut d), Status::NoSuchElement);
}

#[test]
fn test_edge_pair_and_triple_iteration() {
    let mut ctx = Context::default();
    let mut list = Handle::NULL;
    ctx.list_create(&mut list);
    ctx.list_add(list, Element::EdgePair(1, 2));
    ctx.list_add(list, Element::EdgeTriple(3, 4, 0.5));
    let mut it = Handle::NULL;
    ctx.list_it_create(list, &mut it);

    let (mut s, mut t, mut w) = (0, 0, 0.0);
    assert_eq!(ctx.it_next_edge_triple(it, &mut s, &mut t, &mut w), Status::IllegalArgument);
    assert_eq!(ctx.it_next_edge_pair(it, &mut s, &mut t), Status::Success);
    assert_eq!((s, t), (1, 2));
    assert_eq!(ctx.it_next_edge_triple(it, &mut s, &mut t, &mut w), Status::Success);
    assert_eq!((s, t, w), (3, 4, 0.5));
}

#[test]
fn test_set_operations() {
    let mut ctx = Context::default();
    let mut set = Handle::NULL;
    ctx.set_linked_create(&mut set);
    let mut added = false;
    for v in [5, 1, 5, 3] {
        ctx.set_add(set, Element::Int(v), &mut added);
    }
    assert!(added);
    ctx.set_add(set, Element::Int(5), &mut added);
    assert!(!added);

    let mut size = 0;
    ctx.set_size(set, &mut size);
    assert_eq!(size, 3);

    let mut removed = false;
    ctx.set_remove(set, &Element::Int(1), &mut removed);
    assert!(removed);

    let mut it = Handle::NULL;
    ctx.set_it_create(set, &mut it);
    let mut order = Vec::new();
    let mut more = false;
    while ctx.it_has_next(it, &mut more) == Status::Success && more {
        let mut v = 0;
        ctx.it_next_int(it, &mut v);
        order.push(v);
    }
    assert_eq!(order, vec![5, 3]);
}

#[test]
fn test_map_absent_key_is_not_an_error() {
    let mut ctx = Context::default();
    let mut map = Handle::NULL;
    ctx.map_create(&mut map);
    ctx.map_put(map, Element::Int(7), Element::Double(0.25));

    let mut found = true;
    let mut value = Element::Int(-1);
    assert_eq!(ctx.map_get(map, &Element::Int(8), &mut found, &mut value), Status::Success);
    assert!(!found);
    assert_eq!(value, Element::Int(-1));
    assert_eq!(ctx.error_code(), Status::Success);

    let mut d = 0.0;
    ctx.map_get_double(map, &Element::Int(7), &mut found, &mut d);
    assert!(found);
    assert_eq!(d, 0.25);

    let mut i = 0;
    assert_eq!(ctx.map_get_int(map, &Element::Int(7), &mut found, &mut i), Status::IllegalArgument);

    assert_eq!(ctx.map_remove(map, &Element::Int(8), &mut found, &mut value), Status::Success);
    assert!(!found);
    assert_eq!(ctx.map_remove(map, &Element::Int(7), &mut found, &mut value), Status::Success);
    assert!(found);
    assert_eq!(value, Element::Double(0.25));

    let mut contains = true;
    ctx.map_contains_key(map, &Element::Int(7), &mut contains);
    assert!(!contains);
}

#[test]
fn test_linked_map_keeps_insertion_order() {
    let mut ctx = Context::default();
    let mut map = Handle::NULL;
    ctx.map_linked_create(&mut map);
    for (k, v) in [("c", 3), ("a", 1), ("b", 2)] {
        ctx.map_put(map, Element::from(k), Element::Int(v));
    }
    // overwriting keeps the original position
    ctx.map_put(map, Element::from("c"), Element::Int(30));

    let mut keys = Handle::NULL;
    ctx.map_keys_it(map, &mut keys);
    let mut names = Vec::new();
    let mut more = false;
    while ctx.it_has_next(keys, &mut more) == Status::Success && more {
        let mut s = String::new();
        ctx.it_next_string(keys, &mut s);
        names.push(s);
    }
    assert_eq!(names, vec!["c", "a", "b"]);

    let mut values = Handle::NULL;
    ctx.map_values_it(map, &mut values);
    let mut first = 0;
    ctx.it_next_int(values, &mut first);
    assert_eq!(first, 30);

    ctx.map_clear(map);
    let mut size = 1;
    ctx.map_size(map, &mut size);
    assert_eq!(size, 0);
}

#[test]
fn test_attribute_store() {
    let mut ctx = Context::default();
    let mut store = Handle::NULL;
    ctx.attributes_store_create(&mut store);
    ctx.attributes_store_put(store, 4, "color", AttributeValue::from("red"));
    ctx.attributes_store_put(store, 4, "weight", AttributeValue::Double(2.5));

    let mut found = false;
    let mut value = None;
    ctx.attributes_store_get(store, 4, "color", &mut found, &mut value);
    assert!(found);
    assert_eq!(value, Some(AttributeValue::Str("red".to_string())));

    let mut missing = None;
    ctx.attributes_store_get(store, 5, "color", &mut found, &mut missing);
    assert!(!found);
    assert!(missing.is_none());

    ctx.attributes_store_remove(store, 4, "color", &mut found);
    assert!(found);
    ctx.attributes_store_remove(store, 4, "color", &mut found);
    assert!(!found);
}

#[test]
fn test_attribute_registry() {
    let mut ctx = Context::default();
    let mut registry = Handle::NULL;
    ctx.attributes_registry_create(&mut registry);
    assert_eq!(
        ctx.attributes_registry_register(registry, "capacity", "edge", "double", Some("1.5")),
        Status::Success
    );
    assert_eq!(
        ctx.attributes_registry_register(registry, "label", "vertex", "string", None),
        Status::Success
    );
    assert_eq!(
        ctx.attributes_registry_register(registry, "size", "vertex", "int", Some("big")),
        Status::IllegalArgument
    );
    assert_eq!(
        ctx.attributes_registry_register(registry, "size", "vertex", "complex", None),
        Status::IllegalArgument
    );

    let (mut found, mut attribute_type, mut default) = (false, None, None);
    ctx.attributes_registry_get(registry, "capacity", "edge", &mut found, &mut attribute_type, &mut default);
    assert!(found);
    assert_eq!(attribute_type, Some(AttributeType::Double));
    assert_eq!(default, Some(AttributeValue::Double(1.5)));

    // same name, different category
    ctx.attributes_registry_get(registry, "capacity", "vertex", &mut found, &mut attribute_type, &mut default);
    assert!(!found);

    ctx.attributes_registry_unregister(registry, "label", "vertex", &mut found);
    assert!(found);
    ctx.attributes_registry_unregister(registry, "label", "vertex", &mut found);
    assert!(!found);
}
