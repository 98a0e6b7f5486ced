mod common;

use common::{count, setup_db};

use diesel::SqliteConnection;
use pokedex_sync::catalog::{repo, service};
use pokedex_sync::error::CatalogError;
use pokedex_sync::models::pokedex::NewPokeGeneration;

fn create(
    conn: &mut SqliteConnection,
    id: i32,
    name: &str,
    types: &[&str],
) -> service::PokemonView {
    service::create_pokemon(
        conn,
        service::CreatePokemon {
            id: Some(id),
            name: Some(name.to_string()),
            types: Some(
                types
                    .iter()
                    .map(|t| service::NamedEntry {
                        name: t.to_string(),
                    })
                    .collect(),
            ),
            images: Some(serde_json::json!({"front_default": format!("https://img/{id}.png")})),
            is_legendary: None,
            generation_id: None,
            pre_evolution_id: None,
        },
    )
    .expect("create pokemon")
}

#[test]
fn create_resolves_types_through_the_shared_path() {
    let (_db, mut conn) = setup_db();

    let a = create(&mut conn, 1, "bulbasaur", &["grass", "poison"]);
    let b = create(&mut conn, 43, "oddish", &["grass"]);

    assert_eq!(count(&mut conn, "types"), 2);
    let grass_a = a.types.iter().find(|t| t.name == "grass").unwrap();
    let grass_b = b.types.iter().find(|t| t.name == "grass").unwrap();
    assert_eq!(grass_a.id, grass_b.id);
}

#[test]
fn create_rejects_incomplete_and_duplicate_payloads() {
    let (_db, mut conn) = setup_db();
    create(&mut conn, 1, "bulbasaur", &["grass"]);

    let missing = service::create_pokemon(
        &mut conn,
        service::CreatePokemon {
            id: Some(2),
            name: None,
            types: None,
            images: None,
            is_legendary: None,
            generation_id: None,
            pre_evolution_id: None,
        },
    );
    assert!(matches!(missing, Err(CatalogError::Validation(_))));

    let duplicate = service::create_pokemon(
        &mut conn,
        service::CreatePokemon {
            id: Some(1),
            name: Some("double".to_string()),
            types: Some(vec![service::NamedEntry {
                name: "grass".to_string(),
            }]),
            images: Some(serde_json::json!({})),
            is_legendary: None,
            generation_id: None,
            pre_evolution_id: None,
        },
    );
    assert!(matches!(duplicate, Err(CatalogError::Validation(_))));
    assert_eq!(count(&mut conn, "pokemon"), 1);
}

#[test]
fn find_requires_a_filter_and_matches_substrings() {
    let (_db, mut conn) = setup_db();
    create(&mut conn, 1, "bulbasaur", &["grass"]);

    let none = service::find_pokemon(&mut conn, None, None);
    assert!(matches!(none, Err(CatalogError::Validation(_))));

    let by_id = service::find_pokemon(&mut conn, Some(1), None).unwrap();
    assert_eq!(by_id.name, "bulbasaur");

    let by_fragment = service::find_pokemon(&mut conn, None, Some("bulba")).unwrap();
    assert_eq!(by_fragment.id, 1);

    let missing = service::find_pokemon(&mut conn, Some(99), None);
    assert!(matches!(missing, Err(CatalogError::NotFound(_))));
}

#[test]
fn type_filter_requires_one_side() {
    let (_db, mut conn) = setup_db();
    create(&mut conn, 1, "bulbasaur", &["grass", "poison"]);
    create(&mut conn, 43, "oddish", &["grass"]);

    let none = service::find_by_type(&mut conn, None, None);
    assert!(matches!(none, Err(CatalogError::Validation(_))));

    let by_name = service::find_by_type(&mut conn, None, Some("grass")).unwrap();
    assert_eq!(by_name.len(), 2);

    let poison_id = repo::find_type_by_name(&mut conn, "poison")
        .unwrap()
        .unwrap()
        .id;
    let by_id = service::find_by_type(&mut conn, Some(poison_id), None).unwrap();
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].name, "bulbasaur");

    let unknown = service::find_by_type(&mut conn, None, Some("dragon"));
    assert!(matches!(unknown, Err(CatalogError::NotFound(_))));
}

#[test]
fn generation_filters_are_mutually_exclusive() {
    let (_db, mut conn) = setup_db();
    repo::insert_generation(
        &mut conn,
        &NewPokeGeneration {
            id: 1,
            name: "generation-i",
            region: "kanto",
        },
    )
    .unwrap();
    create(&mut conn, 1, "bulbasaur", &["grass"]);
    service::update_pokemon(
        &mut conn,
        1,
        service::UpdatePokemon {
            generation_id: Some(1),
            ..Default::default()
        },
    )
    .unwrap();

    let both = service::find_by_generation(&mut conn, Some("generation-i"), Some("kanto"));
    assert!(matches!(both, Err(CatalogError::Validation(_))));

    let neither = service::find_by_generation(&mut conn, None, None);
    assert!(matches!(neither, Err(CatalogError::Validation(_))));

    let by_name = service::find_by_generation(&mut conn, Some("generation-i"), None).unwrap();
    assert_eq!(by_name.len(), 1);

    let by_region = service::find_by_generation(&mut conn, None, Some("kanto")).unwrap();
    assert_eq!(by_region.len(), 1);
}

#[test]
fn partial_update_leaves_absent_fields_alone() {
    let (_db, mut conn) = setup_db();
    create(&mut conn, 1, "bulbasaur", &["grass", "poison"]);

    // Name-only patch: types and images stay.
    let renamed = service::update_pokemon(
        &mut conn,
        1,
        service::UpdatePokemon {
            name: Some("ivysaur".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(renamed.name, "ivysaur");
    assert_eq!(renamed.types.len(), 2);
    assert_eq!(renamed.images["front_default"], "https://img/1.png");

    // Empty patch: accepted, nothing changes.
    let unchanged = service::update_pokemon(&mut conn, 1, service::UpdatePokemon::default()).unwrap();
    assert_eq!(unchanged.name, "ivysaur");
    assert_eq!(unchanged.types.len(), 2);

    // A provided type list replaces the whole set.
    let retyped = service::update_pokemon(
        &mut conn,
        1,
        service::UpdatePokemon {
            types: Some(vec![service::NamedEntry {
                name: "fire".to_string(),
            }]),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(retyped.types.len(), 1);
    assert_eq!(retyped.types[0].name, "fire");
    // The detached sub-entities survive.
    assert_eq!(count(&mut conn, "types"), 3);
}

#[test]
fn update_of_missing_row_is_not_found() {
    let (_db, mut conn) = setup_db();

    let missing = service::update_pokemon(&mut conn, 7, service::UpdatePokemon::default());
    assert!(matches!(missing, Err(CatalogError::NotFound(_))));
}

#[test]
fn pre_evolution_is_validated_and_settable() {
    let (_db, mut conn) = setup_db();
    create(&mut conn, 1, "bulbasaur", &["grass"]);
    create(&mut conn, 2, "ivysaur", &["grass"]);

    let own = service::update_pokemon(
        &mut conn,
        2,
        service::UpdatePokemon {
            pre_evolution_id: Some(2),
            ..Default::default()
        },
    );
    assert!(matches!(own, Err(CatalogError::Validation(_))));

    let dangling = service::update_pokemon(
        &mut conn,
        2,
        service::UpdatePokemon {
            pre_evolution_id: Some(99),
            ..Default::default()
        },
    );
    assert!(matches!(dangling, Err(CatalogError::Validation(_))));

    let linked = service::update_pokemon(
        &mut conn,
        2,
        service::UpdatePokemon {
            pre_evolution_id: Some(1),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(linked.pre_evolution_id, Some(1));
}

#[test]
fn delete_detaches_associations_but_spares_sub_entities() {
    let (_db, mut conn) = setup_db();
    create(&mut conn, 1, "bulbasaur", &["grass", "poison"]);
    create(&mut conn, 2, "ivysaur", &["grass"]);
    service::update_pokemon(
        &mut conn,
        2,
        service::UpdatePokemon {
            pre_evolution_id: Some(1),
            ..Default::default()
        },
    )
    .unwrap();

    service::delete_pokemon(&mut conn, 1).unwrap();

    assert_eq!(count(&mut conn, "pokemon"), 1);
    assert_eq!(count(&mut conn, "pokemon_types"), 1);
    assert_eq!(count(&mut conn, "types"), 2);
    // The survivor's dangling pre-evolution reference was cleared.
    let survivor = service::find_pokemon(&mut conn, Some(2), None).unwrap();
    assert_eq!(survivor.pre_evolution_id, None);

    let gone = service::delete_pokemon(&mut conn, 1);
    assert!(matches!(gone, Err(CatalogError::NotFound(_))));
}

#[test]
fn type_collection_create_list_delete() {
    let (_db, mut conn) = setup_db();

    let created = service::create_type(&mut conn, "grass").unwrap();
    // Creating the same name again reuses the row.
    let again = service::create_type(&mut conn, "grass").unwrap();
    assert_eq!(created.id, again.id);

    create(&mut conn, 1, "bulbasaur", &["grass"]);

    let listed = service::find_types(&mut conn, None, None).unwrap();
    assert_eq!(listed.len(), 1);
    let by_name = service::find_types(&mut conn, None, Some("gra")).unwrap();
    assert_eq!(by_name[0].id, created.id);

    service::delete_type(&mut conn, created.id).unwrap();
    assert_eq!(count(&mut conn, "types"), 0);
    assert_eq!(count(&mut conn, "pokemon_types"), 0);
    // The creature itself survives the administrative delete.
    assert_eq!(count(&mut conn, "pokemon"), 1);
}

#[test]
fn generation_collection_list_delete() {
    let (_db, mut conn) = setup_db();
    repo::insert_generation(
        &mut conn,
        &NewPokeGeneration {
            id: 1,
            name: "generation-i",
            region: "kanto",
        },
    )
    .unwrap();
    create(&mut conn, 1, "bulbasaur", &["grass"]);
    service::update_pokemon(
        &mut conn,
        1,
        service::UpdatePokemon {
            generation_id: Some(1),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(service::list_generations(&mut conn).unwrap().len(), 1);

    service::delete_generation(&mut conn, 1).unwrap();
    assert_eq!(count(&mut conn, "generations"), 0);
    let view = service::find_pokemon(&mut conn, Some(1), None).unwrap();
    assert!(view.generation.is_none());
}
