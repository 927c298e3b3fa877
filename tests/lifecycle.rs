use mir_core::config::{GenomeConfig, SimConfig, SourceConfig, WorldConfig};
use mir_core::genome::Genome;
use mir_core::organism::{OrgId, Organism};
use mir_core::World;

fn scenario(seed: u64) -> SimConfig {
    SimConfig {
        world: WorldConfig {
            width: 10,
            height: 10,
            substances: 2,
            start_count: 5,
            seed: Some(seed),
            ..Default::default()
        },
        sources: SourceConfig {
            count: 1,
            min_radius: 1,
            max_radius: 3,
            max_intensity: 10.0,
            ..Default::default()
        },
        genome: GenomeConfig {
            genes: 1,
            gene_length: 20,
            snp_rate: 0.0,
        },
        ..Default::default()
    }
}

fn manual_org(world: &mut World, id: u64, x: usize, y: usize, energy: f32, age: u32) -> Organism {
    let mut genome = Genome::random(1, 20, &mut world.rng);
    for gene in &mut genome.genes {
        world.chemistry.determine_enzyme(gene);
    }
    Organism {
        id: OrgId(id),
        x,
        y,
        energy,
        age,
        snp_rate: 0.0,
        genome,
        soul: None,
    }
}

#[test]
fn drained_organism_dies_vacates_cell_and_leaves_graveyard_genome() {
    let mut world = World::new(scenario(3)).unwrap();
    let (x, y, genome) = {
        let org = &world.population.orgs()[0];
        (org.x, org.y, org.genome.clone())
    };
    world.population.orgs_mut()[0].energy = 0.0;

    world.org_die();

    assert!(world
        .population
        .orgs()
        .iter()
        .all(|o| (o.x, o.y) != (x, y)));
    assert!(!world.population.is_occupied(x as i64, y as i64));
    assert_eq!(world.population.graveyard_at(x as i64, y as i64), Some(&genome));
}

#[test]
fn old_age_is_lethal_unless_disabled() {
    let mut config = scenario(4);
    config.organism.max_age = 50;
    let mut world = World::new(config).unwrap();
    for org in world.population.orgs_mut() {
        org.age = 51;
        org.energy = 100.0;
    }
    world.org_die();
    assert!(world.population.is_empty());

    let mut config = scenario(4);
    config.organism.max_age = -1;
    let mut world = World::new(config).unwrap();
    for org in world.population.orgs_mut() {
        org.age = 1_000_000;
        org.energy = 100.0;
    }
    world.org_die();
    assert_eq!(world.population.len(), 5);
}

#[test]
fn division_halves_energy_and_mirrors_it_into_the_child() {
    let mut config = scenario(5);
    config.world.start_count = 1;
    config.organism.divide_energy = 10.0;
    config.organism.min_divide_age = 1;
    let mut world = World::new(config).unwrap();
    assert_eq!(world.population.len(), 1);

    let parent_id = world.population.orgs()[0].id;
    {
        let parent = &mut world.population.orgs_mut()[0];
        parent.energy = 100.0;
        parent.age = 10;
    }

    world.org_divide();

    assert_eq!(world.population.len(), 2);
    let parent = world
        .population
        .orgs()
        .iter()
        .find(|o| o.id == parent_id)
        .unwrap();
    let child = world
        .population
        .orgs()
        .iter()
        .find(|o| o.id != parent_id)
        .unwrap();
    assert_eq!(parent.energy, 50.0);
    assert_eq!(child.energy, 50.0);
    assert_eq!(child.age, 0);
    // Mutation rate zero: the genome is copied verbatim.
    assert_eq!(child.genome, parent.genome);

    // The child sits in the parent's Moore neighbourhood (torus-aware).
    let dx = (child.x as i64 - parent.x as i64).rem_euclid(10);
    let dy = (child.y as i64 - parent.y as i64).rem_euclid(10);
    assert!(dx == 1 || dx == 9 || dy == 1 || dy == 9);
}

#[test]
fn enclosed_organism_never_divides_until_a_cell_frees_up() {
    let mut config = scenario(6);
    config.organism.divide_energy = 10.0;
    config.organism.min_divide_age = 100;
    let mut world = World::new(config).unwrap();
    world.population.clear_organisms();

    // Centre organism ready to divide, walled in by 8 neighbours that
    // are not (too young).
    let centre = manual_org(&mut world, 100, 5, 5, 1000.0, 200);
    world.population.place(centre);
    let mut id = 101;
    for dx in -1i64..=1 {
        for dy in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let org = manual_org(
                &mut world,
                id,
                (5 + dx) as usize,
                (5 + dy) as usize,
                5.0,
                0,
            );
            world.population.place(org);
            id += 1;
        }
    }
    assert_eq!(world.population.len(), 9);

    for _ in 0..10 {
        world.org_divide();
        assert_eq!(world.population.len(), 9, "no free neighbour, no child");
    }

    // Starve one neighbour; the next divide fills exactly that cell.
    let victim = world
        .population
        .orgs()
        .iter()
        .position(|o| (o.x, o.y) == (4, 4))
        .unwrap();
    world.population.orgs_mut()[victim].energy = 0.0;
    world.org_die();
    assert_eq!(world.population.len(), 8);

    world.org_divide();
    assert_eq!(world.population.len(), 9);
    assert!(world.population.is_occupied(4, 4));
    let child = world
        .population
        .orgs()
        .iter()
        .find(|o| (o.x, o.y) == (4, 4))
        .unwrap();
    assert_eq!(child.age, 0);
}

#[test]
fn failed_division_spends_no_energy() {
    let mut config = scenario(8);
    config.organism.divide_energy = 10.0;
    config.organism.min_divide_age = 100;
    let mut world = World::new(config).unwrap();
    world.population.clear_organisms();
    let centre = manual_org(&mut world, 100, 5, 5, 777.0, 200);
    world.population.place(centre);
    let mut id = 101;
    for dx in -1i64..=1 {
        for dy in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let org = manual_org(
                &mut world,
                id,
                (5 + dx) as usize,
                (5 + dy) as usize,
                5.0,
                0,
            );
            world.population.place(org);
            id += 1;
        }
    }
    world.org_divide();
    let centre = world
        .population
        .orgs()
        .iter()
        .find(|o| (o.x, o.y) == (5, 5))
        .unwrap();
    assert_eq!(centre.energy, 777.0);
}

#[test]
fn extinction_reseeds_within_the_same_tick() {
    let mut world = World::new(scenario(9)).unwrap();
    for org in world.population.orgs_mut() {
        org.energy = -1.0e9;
    }
    let generation = world.generation;

    world.step();

    assert!(!world.population.is_empty());
    assert_eq!(world.generation, generation + 1);
    // The reseed zeroes the field.
    for org in world.population.orgs() {
        assert_eq!(org.age, 0);
    }
}

#[test]
fn eat_clamps_energy_to_the_ceiling() {
    let mut config = scenario(10);
    config.organism.max_energy = 100.0;
    config.organism.expression_cost = 0.0;
    let mut world = World::new(config).unwrap();
    for org in world.population.orgs_mut() {
        org.energy = 99.9;
    }
    // Flood every input substance so every gene eats at the cap.
    for org_idx in 0..world.population.len() {
        let (x, y, input) = {
            let org = &world.population.orgs()[org_idx];
            (org.x as i64, org.y as i64, org.genome.genes[0].input)
        };
        world.field.add(x, y, input, 1000.0);
    }
    world.org_eat();
    for org in world.population.orgs() {
        assert!(org.energy <= 100.0);
    }
}
