use shelf_compare::{compare, CompareError, Summary};
use shelf_proto::{Detection, DiscrepancyKind, NormRect, Planogram, PlanogramItem};

fn one_shelf() -> Planogram {
    Planogram::new("p1", 1, 1000)
}

fn item(id: &str, product: &str, shelf: i32, x: i32, w: i32) -> PlanogramItem {
    PlanogramItem::new(id, "p1", product, shelf, x, w)
}

fn boxed(id: &str, left: f64, top: f64, right: f64, bottom: f64) -> Detection {
    Detection::new(id, NormRect::new(left, top, right, bottom))
}

#[test]
fn empty_detections_report_every_item_missing() {
    let items = vec![item("i1", "P1", 0, 0, 500), item("i2", "P2", 0, 500, 500)];
    let out = compare(&one_shelf(), &items, &[]).unwrap();

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].kind, DiscrepancyKind::Missing { planogram_item_id: "i1".into() });
    assert_eq!(out[1].kind, DiscrepancyKind::Missing { planogram_item_id: "i2".into() });
    assert!(out.iter().all(|d| !d.is_overstock()));
}

#[test]
fn matching_label_is_compliant() {
    let items = vec![item("i1", "bread-123", 0, 0, 1000)];
    let dets = vec![boxed("d1", 0.1, 0.1, 0.5, 0.9).with_label("bread-123")];
    assert!(compare(&one_shelf(), &items, &dets).unwrap().is_empty());
}

#[test]
fn different_label_is_misplaced() {
    let items = vec![item("i1", "bread-123", 0, 0, 1000)];
    let dets = vec![boxed("d1", 0.1, 0.1, 0.5, 0.9).with_label("dairy")];
    let out = compare(&one_shelf(), &items, &dets).unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(
        out[0].kind,
        DiscrepancyKind::Misplaced { planogram_item_id: "i1".into(), detection_id: "d1".into() }
    );
}

#[test]
fn detection_outside_every_cell_is_overstock() {
    let items = vec![item("i1", "milk", 0, 0, 500)];
    let dets = vec![boxed("in", 0.1, 0.2, 0.3, 0.8), boxed("out", 0.8, 0.2, 1.0, 0.8)];
    let out = compare(&one_shelf(), &items, &dets).unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].kind, DiscrepancyKind::Overstock { detection_id: "out".into() });
}

#[test]
fn zero_width_shelf_is_invalid_layout() {
    let p = Planogram::new("p1", 1, 0);
    let items = vec![item("i1", "milk", 0, 0, 500)];
    let dets = vec![boxed("d1", 0.1, 0.1, 0.5, 0.9)];
    let err = compare(&p, &items, &dets).unwrap_err();
    assert_eq!(err, CompareError::InvalidLayout { shelves_count: 1, shelf_width_mm: 0 });
}

#[test]
fn center_on_cell_edge_counts_as_inside() {
    // cell spans x in [0, 0.5]; center lands exactly on 0.5
    let items = vec![item("i1", "milk", 0, 0, 500)];
    let dets = vec![boxed("d1", 0.25, 0.0, 0.75, 1.0)];
    assert!(compare(&one_shelf(), &items, &dets).unwrap().is_empty());

    // bottom edge of the upper row on a 2-shelf planogram
    let p = Planogram::new("p1", 2, 1000);
    let items = vec![item("top", "milk", 0, 0, 1000)];
    let dets = vec![boxed("d1", 0.4, 0.25, 0.6, 0.75)];
    assert!(compare(&p, &items, &dets).unwrap().is_empty());
}

fn busy_scene() -> (Planogram, Vec<PlanogramItem>, Vec<Detection>) {
    let p = Planogram::new("p1", 3, 1200);
    let items = vec![
        item("a", "milk", 0, 0, 400),
        item("b", "bread", 0, 400, 400),
        item("c", "juice", 1, 0, 1200),
        item("d", "cereal", 2, 800, 400),
        item("e", "eggs", 2, 0, 400),
    ];
    let dets = vec![
        boxed("d1", 0.05, 0.05, 0.25, 0.3).with_label("milk"),
        boxed("d2", 0.4, 0.05, 0.6, 0.3).with_label("Food"),
        boxed("d3", 0.4, 0.4, 0.6, 0.6),
        boxed("d4", 0.4, 0.7, 0.6, 0.95),
        boxed("d5", 0.7, 0.7, 0.98, 0.95).with_label(""),
    ];
    (p, items, dets)
}

#[test]
fn repeated_comparison_is_identical() {
    let (p, items, dets) = busy_scene();
    let first = compare(&p, &items, &dets).unwrap();
    let second = compare(&p, &items, &dets).unwrap();
    assert_eq!(first, second);
}

#[test]
fn every_item_has_at_most_one_discrepancy() {
    let (p, items, dets) = busy_scene();
    let out = compare(&p, &items, &dets).unwrap();
    for it in &items {
        let n = out.iter().filter(|d| d.planogram_item_id() == Some(it.id.as_str())).count();
        assert!(n <= 1, "item {} has {} discrepancies", it.id, n);
    }
}

#[test]
fn counts_are_conserved() {
    let (p, items, dets) = busy_scene();
    let out = compare(&p, &items, &dets).unwrap();
    let s = Summary::of(&items, &dets, &out);

    assert_eq!(s.matched + s.missing + s.misplaced, items.len());
    // d1 -> a, d2 -> b (misplaced), d3 -> c, d5 -> d (empty label); e missing; d4 unmatched
    assert_eq!(s.missing, 1);
    assert_eq!(s.misplaced, 1);
    assert_eq!(s.overstock, 1);
    assert_eq!(s.matched, 3);

    let kinds: Vec<&DiscrepancyKind> = out.iter().map(|d| &d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &DiscrepancyKind::Misplaced { planogram_item_id: "b".into(), detection_id: "d2".into() },
            &DiscrepancyKind::Missing { planogram_item_id: "e".into() },
            &DiscrepancyKind::Overstock { detection_id: "d4".into() },
        ]
    );
}

#[test]
fn inputs_are_left_untouched() {
    let (p, items, dets) = busy_scene();
    let (p2, items2, dets2) = (p.clone(), items.clone(), dets.clone());
    let _ = compare(&p, &items, &dets).unwrap();
    assert_eq!(p, p2);
    assert_eq!(items, items2);
    assert_eq!(dets, dets2);
}
