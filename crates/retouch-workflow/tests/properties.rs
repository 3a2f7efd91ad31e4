//! Property tests for URL composition and selection handling.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use proptest::sample::subsequence;
use rand::SeedableRng;
use rand::rngs::StdRng;
use retouch_workflow::{Catalog, Workflow, build_chain_url};

const BASE: &str = "https://ik.imagekit.io/demo/img/plant.jpeg";

fn catalog_ids() -> Vec<&'static str> {
    Catalog::standard().list_all().iter().map(|o| o.id).collect()
}

/// A non-empty catalog subset in arbitrary order.
fn shuffled_subset() -> impl Strategy<Value = Vec<&'static str>> {
    let ids = catalog_ids();
    let len = ids.len();
    subsequence(ids, 1..=len).prop_shuffle()
}

proptest! {
    #[test]
    fn chain_contains_fragments_in_selection_order(ids in shuffled_subset()) {
        let catalog = Catalog::standard();
        let fragments = catalog.resolve(&ids);
        let url = build_chain_url(BASE, &fragments);

        let (_, chain) = url.split_once("?tr=").unwrap();
        prop_assert_eq!(chain, fragments.join(":"));

        let mut cursor = 0;
        for fragment in &fragments {
            let found = url[cursor..].find(fragment);
            prop_assert!(found.is_some(), "fragment {} missing or out of order", fragment);
            cursor += found.unwrap() + fragment.len();
        }
    }

    #[test]
    fn resolve_drops_exactly_the_unknown_ids(
        known in shuffled_subset(),
        unknown in prop::collection::vec("[a-z]{3,8}-unknown", 0..4),
        positions in prop::collection::vec(any::<prop::sample::Index>(), 0..4),
    ) {
        let catalog = Catalog::standard();
        let mut mixed: Vec<String> = known.iter().map(|s| (*s).to_owned()).collect();
        for (id, at) in unknown.iter().zip(&positions) {
            let at = at.index(mixed.len() + 1);
            mixed.insert(at, id.clone());
        }

        let resolved = catalog.resolve(&mixed);
        let expected = catalog.resolve(&known);
        prop_assert_eq!(resolved, expected);
    }

    #[test]
    fn double_toggle_restores_selection(
        initial in shuffled_subset(),
        id in prop::sample::select(catalog_ids()),
        seed in any::<u64>(),
    ) {
        let mut workflow = Workflow::default();
        workflow.pick_demo_with(&mut StdRng::seed_from_u64(seed));
        for existing in &initial {
            workflow.toggle_transformation(existing);
        }
        let before = workflow.selection().clone();

        workflow.toggle_transformation(id);
        workflow.toggle_transformation(id);
        prop_assert_eq!(workflow.selection(), &before);
    }

    #[test]
    fn toggle_always_invalidates_result(
        initial in shuffled_subset(),
        id in prop::sample::select(catalog_ids()),
        seed in any::<u64>(),
    ) {
        let mut workflow = Workflow::default();
        workflow.pick_demo_with(&mut StdRng::seed_from_u64(seed));
        for existing in &initial {
            workflow.toggle_transformation(existing);
        }
        prop_assert!(workflow.commit().is_ok());
        prop_assert!(workflow.result().is_some());

        workflow.toggle_transformation(id);
        prop_assert!(workflow.result().is_none());
    }

    #[test]
    fn result_never_exists_with_empty_selection(
        ops in prop::collection::vec(
            prop_oneof![
                prop::sample::select(catalog_ids()).prop_map(Op::Toggle),
                Just(Op::Commit),
                Just(Op::Demo),
                Just(Op::Reset),
            ],
            0..40,
        ),
    ) {
        let mut workflow = Workflow::default();
        let mut rng = StdRng::seed_from_u64(0);
        for op in ops {
            match op {
                Op::Toggle(id) => {
                    workflow.toggle_transformation(id);
                }
                Op::Commit => {
                    let _ = workflow.commit();
                }
                Op::Demo => {
                    workflow.pick_demo_with(&mut rng);
                }
                Op::Reset => workflow.reset(),
            }
            prop_assert!(workflow.result().is_none() || !workflow.selection().is_empty());
        }
    }
}

#[derive(Debug, Clone)]
enum Op {
    Toggle(&'static str),
    Commit,
    Demo,
    Reset,
}
