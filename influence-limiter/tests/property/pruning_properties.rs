use influence_limiter::{
    MaxInfluences, PrunePlan, PruneRequest, WeightTable, expand_expressions,
    host::{DeformerHandle, MemoryScene, SkinHost, VertexId},
    limiter::apply_requests,
};
use proptest::prelude::*;

const JOINTS: [&str; 8] = ["j0", "j1", "j2", "j3", "j4", "j5", "j6", "j7"];

/// Normalized weight tables over distinct joints, in arbitrary order
fn weight_table() -> impl Strategy<Value = Vec<(&'static str, f64)>> {
    prop::collection::vec(0.01f64..1.0, 0..=JOINTS.len())
        .prop_flat_map(|raw| {
            let total: f64 = raw.iter().sum();
            let weights: Vec<f64> = raw.iter().map(|w| w / total).collect();
            Just(weights).prop_shuffle()
        })
        .prop_map(|weights| JOINTS.iter().copied().zip(weights).collect())
}

fn table_of(pairs: &[(&'static str, f64)]) -> WeightTable {
    pairs.iter().copied().collect()
}

proptest! {
    #[test]
    fn within_cap_is_identity(pairs in weight_table(), extra in 0usize..4) {
        let table = table_of(&pairs);
        let cap = MaxInfluences::new((table.len() + extra).max(1) as i64).unwrap();
        let plan = PrunePlan::compute(&table, cap);
        prop_assert!(plan.is_noop());
        prop_assert!(plan.requests().is_empty());
        prop_assert_eq!(plan.preview(), table);
    }

    #[test]
    fn over_cap_keeps_exactly_cap(pairs in weight_table(), cap in 1usize..8) {
        let table = table_of(&pairs);
        prop_assume!(table.len() > cap);
        let plan = PrunePlan::compute(&table, MaxInfluences::new(cap as i64).unwrap());

        prop_assert_eq!(plan.kept().len(), cap);
        prop_assert_eq!(plan.pruned().len(), table.len() - cap);

        let requests = plan.requests();
        prop_assert_eq!(requests.len(), table.len() - cap + 1);
        prop_assert_eq!(requests.last(), Some(&PruneRequest::Renormalize));
    }

    #[test]
    fn kept_outweigh_pruned(pairs in weight_table(), cap in 1usize..8) {
        let table = table_of(&pairs);
        let plan = PrunePlan::compute(&table, MaxInfluences::new(cap as i64).unwrap());
        let lightest_kept = plan.kept().iter().map(|w| w.weight).fold(f64::INFINITY, f64::min);
        for pruned in plan.pruned() {
            prop_assert!(pruned.weight <= lightest_kept);
        }
    }

    #[test]
    fn preview_sums_to_one(pairs in weight_table(), cap in 1usize..8) {
        let table = table_of(&pairs);
        prop_assume!(!table.is_empty());
        let plan = PrunePlan::compute(&table, MaxInfluences::new(cap as i64).unwrap());
        prop_assert!((plan.preview().total_weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn host_renormalization_matches_preview(pairs in weight_table(), cap in 1usize..8) {
        let mut scene = MemoryScene::new();
        scene.add_mesh("m", 1);
        scene.bind_skin("m", "skin", &JOINTS).unwrap();
        scene.set_vertex_weights("skin", 0, &pairs).unwrap();

        let deformer = DeformerHandle::new("skin");
        let vertex = VertexId::new("m", 0);
        let table: WeightTable = scene
            .query_weight_table(&deformer, &vertex)
            .unwrap()
            .into_iter()
            .collect();
        let plan = PrunePlan::compute(&table, MaxInfluences::new(cap as i64).unwrap());
        apply_requests(&mut scene, &deformer, &vertex, &plan.requests()).unwrap();

        let after: WeightTable = scene
            .query_weight_table(&deformer, &vertex)
            .unwrap()
            .into_iter()
            .collect();
        prop_assert!(after.len() <= cap);
        for entry in plan.preview().iter() {
            prop_assert!((after.weight_of(entry.influence.as_str()) - entry.weight).abs() < 1e-9);
        }
        if !table.is_empty() {
            prop_assert!(after.is_normalized(1e-9));
        }
    }

    #[test]
    fn nonpositive_cap_rejected(cap in i64::MIN..=0) {
        prop_assert!(MaxInfluences::new(cap).is_err());
    }

    #[test]
    fn range_expands_inclusive(start in 0u32..1000, len in 0u32..50) {
        let end = start + len;
        let vertices = expand_expressions([format!("mesh.vtx[{start}:{end}]")]).unwrap();
        prop_assert_eq!(vertices.len(), len as usize + 1);
        prop_assert!(vertices.iter().zip(start..).all(|(v, i)| v.index == i));
    }
}
