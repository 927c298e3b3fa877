use mir_core::config::{GenomeConfig, SimConfig, SourceConfig, WorldConfig};
use mir_core::lineage::LineageTree;
use mir_core::World;
use proptest::prelude::*;

proptest! {
    /// A node is never freed while anything in its subtree is alive,
    /// whatever shape the tree takes and whatever order deaths arrive
    /// in; once every organism is dead only the root remains.
    #[test]
    fn nodes_prune_only_after_their_whole_subtree_dies(
        parents in proptest::collection::vec(any::<prop::sample::Index>(), 1..40),
        order in proptest::collection::vec(any::<prop::sample::Index>(), 40),
    ) {
        let mut tree = LineageTree::new();
        let mut ids = Vec::new();
        for pick in &parents {
            let pool = ids.len() + 1;
            let parent = match pick.index(pool) {
                0 => tree.root(),
                i => ids[i - 1],
            };
            ids.push(tree.birth(parent));
        }

        let mut remaining = ids.clone();
        for pick in &order {
            if remaining.is_empty() {
                break;
            }
            let victim = remaining.swap_remove(pick.index(remaining.len()));
            tree.mark_dead(victim);

            prop_assert!(tree.contains(tree.root()));
            for &id in &ids {
                if tree.contains(id) && !tree.is_alive(id) {
                    prop_assert!(
                        tree.has_living_descendant(id),
                        "dead node retained without living descendants"
                    );
                }
            }
            for &id in &remaining {
                prop_assert!(tree.contains(id), "living node was pruned");
            }
        }

        prop_assert_eq!(tree.len(), 1);
    }
}

fn breeding_config(seed: u64) -> SimConfig {
    SimConfig {
        world: WorldConfig {
            width: 12,
            height: 12,
            substances: 2,
            start_count: 10,
            seed: Some(seed),
            ..Default::default()
        },
        sources: SourceConfig {
            count: 2,
            min_radius: 1,
            max_radius: 4,
            ..Default::default()
        },
        genome: GenomeConfig {
            genes: 1,
            gene_length: 20,
            snp_rate: 0.01,
        },
        ..Default::default()
    }
}

#[test]
fn live_organisms_always_hold_live_tree_nodes() {
    let mut config = breeding_config(21);
    config.organism.divide_energy = 15.0;
    config.organism.min_divide_age = 3;
    let mut world = World::new(config).unwrap();
    for _ in 0..300 {
        world.step();
        let tree = world.lineage.as_ref().unwrap();
        for org in world.population.orgs() {
            let soul = org.soul.expect("tracking enabled");
            assert!(tree.contains(soul));
            assert!(tree.is_alive(soul));
        }
    }
}

#[test]
fn naming_pass_prefixes_every_live_organism_with_the_root() {
    let mut config = breeding_config(22);
    config.organism.divide_energy = 15.0;
    config.organism.min_divide_age = 3;
    let mut world = World::new(config).unwrap();
    for _ in 0..200 {
        world.step();
    }
    assert!(!world.population.is_empty());
    world.assign_lineage_names();
    for record in world.genome_records() {
        assert!(
            record.name == "adam" || record.name.starts_with("adam_"),
            "unexpected lineage name {}",
            record.name
        );
        assert_eq!(record.genes.len(), 1);
    }
}

#[test]
fn tree_collapses_to_root_when_every_organism_dies() {
    // After arbitrary churn, every retained node sits on a path from
    // the root to a living organism, so a total wipe-out must leave
    // the root alone.
    let mut config = breeding_config(23);
    config.organism.divide_energy = 12.0;
    config.organism.min_divide_age = 2;
    config.organism.max_age = 40;
    let mut world = World::new(config).unwrap();
    for _ in 0..2000 {
        world.step();
    }
    assert!(world.lineage.as_ref().unwrap().len() > 1);

    for org in world.population.orgs_mut() {
        org.energy = -1.0;
    }
    world.org_die();
    assert!(world.population.is_empty());
    assert_eq!(world.lineage.as_ref().unwrap().len(), 1);
}
