use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use lit_layout::{
    InstanceConfig, LayoutEngine, LayoutError, LayoutEvent, ModuleRegistry, SelectionSlot,
    UpdateKind, UrlConfiguration,
};
use lit_model::{
    ComponentSpecifier, DatasetSpec, DeclaredLayout, FieldType, ModelInfo, ModelSpec, ModelSpecs,
    ModuleDescriptor, Spec, TabLayout,
};

fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register("table-module", ModuleDescriptor::new("Table"));
    registry.register(
        "per-model-module",
        ModuleDescriptor::new("Per Model").with_model_duplication(true),
    );
    registry.register(
        "editor-module",
        ModuleDescriptor::new("Editor").with_example_duplication(true),
    );
    registry.register(
        "both-module",
        ModuleDescriptor::new("Both")
            .with_model_duplication(true)
            .with_example_duplication(true),
    );
    registry.register(
        "collapsed-module",
        ModuleDescriptor::new("Collapsed").collapsed_by_default(true),
    );
    registry.register(
        "never-module",
        ModuleDescriptor::new("Never")
            .with_model_duplication(true)
            .with_example_duplication(true)
            .collapsed_by_default(true)
            .display_when(|_, _| false),
    );
    registry.register(
        "needs-models-module",
        ModuleDescriptor::new("Needs Models").display_when(|models, _| !models.is_empty()),
    );
    registry
}

fn engine() -> LayoutEngine {
    LayoutEngine::new(registry())
}

fn models(names: &[&str]) -> ModelSpecs {
    names
        .iter()
        .map(|name| {
            let mut output = Spec::new();
            output.insert("probas".to_string(), FieldType::new("MulticlassPreds"));
            (
                (*name).to_string(),
                ModelInfo::new(ModelSpec {
                    input: Spec::new(),
                    output,
                }),
            )
        })
        .collect()
}

fn layout(tabs: Vec<TabLayout>) -> DeclaredLayout {
    DeclaredLayout::new(tabs)
}

fn group<'a>(engine: &'a LayoutEngine, tab: &str, index: usize) -> &'a [InstanceConfig] {
    &engine.render_layout().tab(tab).expect("tab rendered").groups[index]
}

fn init(engine: &mut LayoutEngine, tabs: Vec<TabLayout>, models: &ModelSpecs, compare: bool) {
    engine
        .initialize_layout(layout(tabs), models, &DatasetSpec::new(), compare)
        .expect("initialize layout");
}

#[test]
fn empty_layout_renders_nothing() {
    let mut engine = engine();
    init(&mut engine, vec![], &models(&["m1"]), true);

    assert!(engine.render_layout().is_empty());
    assert!(engine.all_module_keys().is_empty());
    assert!(engine.hidden_module_keys().is_empty());
}

#[test]
fn hidden_component_contributes_no_key() {
    let mut engine = engine();
    init(
        &mut engine,
        vec![TabLayout::new("Main", ["never-module", "table-module"])],
        &models(&["m1", "m2"]),
        true,
    );

    assert!(!engine.all_module_keys().contains("Main_Never"));
    assert!(!engine.hidden_module_keys().contains("Main_Never"));
    assert_eq!(
        engine.render_layout().tab("Main").map(|tab| tab.keys()),
        Some(vec!["Main_Table"])
    );
}

#[test]
fn model_duplication_follows_model_order() {
    let mut engine = engine();
    init(
        &mut engine,
        vec![TabLayout::new("Main", ["per-model-module"])],
        &models(&["zeta", "alpha"]),
        false,
    );

    let instances = group(&engine, "Main", 0);
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].model_name.as_deref(), Some("zeta"));
    assert_eq!(instances[1].model_name.as_deref(), Some("alpha"));
    assert!(instances.iter().all(|i| i.selection_slot.is_none()));
    assert!(instances.iter().all(|i| i.key == "Main_Per Model"));
}

#[test]
fn example_duplication_puts_reference_slot_first() {
    let mut engine = engine();
    init(
        &mut engine,
        vec![TabLayout::new("Main", ["editor-module"])],
        &models(&["m1"]),
        true,
    );

    let instances = group(&engine, "Main", 0);
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].selection_slot, Some(SelectionSlot::Reference));
    assert_eq!(instances[1].selection_slot, Some(SelectionSlot::Primary));
    assert_eq!(instances[0].key, instances[1].key);
    assert!(instances.iter().all(|i| i.model_name.is_none()));
}

#[test]
fn compare_mode_without_duplication_binds_primary_slot() {
    let mut engine = engine();
    init(
        &mut engine,
        vec![TabLayout::new("Main", ["table-module"])],
        &models(&["m1"]),
        true,
    );

    let instances = group(&engine, "Main", 0);
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].selection_slot, Some(SelectionSlot::Primary));
}

#[test]
fn model_and_example_duplication_multiply() {
    let mut engine = engine();
    init(
        &mut engine,
        vec![TabLayout::new("Main", ["both-module"])],
        &models(&["a", "b"]),
        true,
    );

    let order: Vec<(Option<&str>, Option<u8>)> = group(&engine, "Main", 0)
        .iter()
        .map(|i| (i.model_name.as_deref(), i.selection_slot.map(SelectionSlot::index)))
        .collect();
    assert_eq!(
        order,
        vec![
            (Some("a"), Some(1)),
            (Some("a"), Some(0)),
            (Some("b"), Some(1)),
            (Some("b"), Some(0)),
        ]
    );
}

#[test]
fn model_duplication_with_no_models_produces_no_group() {
    let mut engine = engine();
    init(
        &mut engine,
        vec![TabLayout::new("Main", ["per-model-module"])],
        &ModelSpecs::new(),
        false,
    );

    assert!(engine.render_layout().is_empty());
    assert!(engine.all_module_keys().is_empty());
}

#[test]
fn collapse_by_default_reapplies_after_unhide() {
    let mut engine = engine();
    let tabs = vec![TabLayout::new("Main", ["collapsed-module", "table-module"])];
    init(&mut engine, tabs, &models(&["m1"]), false);

    let collapsed = group(&engine, "Main", 0)[0].clone();
    assert!(engine.is_module_group_hidden(&collapsed));

    engine.toggle_hidden_module(&collapsed, false);
    assert!(!engine.is_module_group_hidden(&collapsed));

    engine
        .update_render_layout(&models(&["m1"]), &DatasetSpec::new(), false)
        .unwrap();
    assert!(engine.is_module_group_hidden(&collapsed));
}

#[test]
fn stale_hidden_keys_are_pruned() {
    let mut engine = engine();
    init(
        &mut engine,
        vec![TabLayout::new("tabA", ["table-module"])],
        &models(&["m1"]),
        false,
    );
    engine.set_hidden_modules(["tabA_Table", "tabA_Foo"]);

    engine
        .update_render_layout(&models(&["m1"]), &DatasetSpec::new(), false)
        .unwrap();

    assert!(engine.hidden_module_keys().contains("tabA_Table"));
    assert!(!engine.hidden_module_keys().contains("tabA_Foo"));
}

#[test]
fn toggles_are_idempotent() {
    let mut engine = engine();
    init(
        &mut engine,
        vec![TabLayout::new("Main", ["table-module"])],
        &models(&["m1"]),
        false,
    );
    let config = group(&engine, "Main", 0)[0].clone();

    engine.toggle_hidden_module(&config, true);
    engine.toggle_hidden_module(&config, true);
    assert!(engine.is_module_group_hidden(&config));

    engine.toggle_hidden_module(&config, false);
    assert!(!engine.is_module_group_hidden(&config));
    engine.toggle_hidden_module(&config, false);
    assert!(!engine.is_module_group_hidden(&config));
}

#[test]
fn filtered_out_tab_is_omitted() {
    let mut engine = engine();
    let tabs = vec![
        TabLayout::new("Main", ["table-module"]),
        TabLayout::new("Hidden", ["never-module"]),
        TabLayout::new("Empty", Vec::<ComponentSpecifier>::new()),
        TabLayout::new("Waiting", ["needs-models-module"]),
    ];
    init(&mut engine, tabs, &ModelSpecs::new(), false);

    assert_eq!(engine.render_layout().tab_names(), vec!["Main"]);
    assert_eq!(engine.declared_layout().components.len(), 4);
}

#[test]
fn set_hidden_modules_copies_the_input() {
    let mut engine = engine();
    let mut keys: BTreeSet<String> = ["Main_Table".to_string()].into_iter().collect();

    engine.set_hidden_modules(keys.iter());
    keys.insert("Main_Editor".to_string());
    keys.remove("Main_Table");

    assert_eq!(
        engine.hidden_module_keys().iter().collect::<Vec<_>>(),
        vec!["Main_Table"]
    );
}

#[test]
fn duplicate_titles_in_one_tab_share_a_key() {
    let mut engine = engine();
    let twin = ModuleDescriptor::new("Table").with_example_duplication(true);
    let tabs = vec![TabLayout::new(
        "Main",
        [
            ComponentSpecifier::by_name("table-module"),
            ComponentSpecifier::by_class(twin),
        ],
    )];
    init(&mut engine, tabs, &models(&["m1"]), false);

    let main = engine.render_layout().tab("Main").unwrap();
    assert_eq!(main.groups.len(), 2);
    assert_eq!(main.keys(), vec!["Main_Table", "Main_Table"]);
    assert_eq!(engine.all_module_keys().len(), 1);

    // Hiding one hides both.
    let first = main.groups[0][0].clone();
    let second = main.groups[1][0].clone();
    engine.toggle_hidden_module(&first, true);
    assert!(engine.is_module_group_hidden(&second));
}

#[test]
fn groups_within_a_tab_are_flattened_in_order() {
    let mut engine = engine();
    let tabs = vec![
        TabLayout::new("Main", ["table-module"]).with_group(["editor-module", "collapsed-module"]),
    ];
    init(&mut engine, tabs, &models(&["m1"]), false);

    assert_eq!(
        engine.render_layout().tab("Main").unwrap().keys(),
        vec!["Main_Table", "Main_Editor", "Main_Collapsed"]
    );
}

#[test]
fn repeated_tab_name_is_rejected() {
    let mut engine = engine();
    init(
        &mut engine,
        vec![TabLayout::new("Main", ["table-module"])],
        &models(&["m1"]),
        false,
    );
    let before = engine.render_layout().clone();

    let err = engine
        .initialize_layout(
            layout(vec![
                TabLayout::new("Main", ["table-module"]),
                TabLayout::new("Main", ["editor-module"]),
            ]),
            &models(&["m1"]),
            &DatasetSpec::new(),
            false,
        )
        .unwrap_err();

    assert_eq!(
        err,
        LayoutError::DuplicateTab {
            name: "Main".to_string()
        }
    );
    assert_eq!(engine.render_layout(), &before);
    assert_eq!(engine.declared_layout().component_count(), 1);
}

#[test]
fn unknown_module_leaves_state_untouched() {
    let mut engine = engine();
    init(
        &mut engine,
        vec![TabLayout::new("Main", ["table-module"])],
        &models(&["m1"]),
        false,
    );
    let before = engine.render_layout().clone();

    let err = engine
        .initialize_layout(
            layout(vec![
                TabLayout::new("Main", ["editor-module"]),
                TabLayout::new("Broken", ["missing-module"]),
            ]),
            &models(&["m1"]),
            &DatasetSpec::new(),
            false,
        )
        .unwrap_err();

    assert_eq!(
        err,
        LayoutError::UnknownModule {
            name: "missing-module".to_string()
        }
    );
    assert_eq!(engine.render_layout(), &before);
    assert_eq!(engine.declared_layout().components.tab_names(), vec!["Main"]);
}

#[test]
fn clear_layout_keeps_data_independent_modules_and_redraws() {
    let redraws = Rc::new(RefCell::new(0));
    let mut engine = engine();
    {
        let redraws = Rc::clone(&redraws);
        engine.set_render_modules_callback(move || *redraws.borrow_mut() += 1);
    }
    init(
        &mut engine,
        vec![TabLayout::new(
            "Main",
            ["table-module", "needs-models-module", "per-model-module"],
        )],
        &models(&["m1"]),
        true,
    );
    assert_eq!(*redraws.borrow(), 0);

    engine.clear_layout().unwrap();

    let instances = group(&engine, "Main", 0);
    assert_eq!(engine.render_layout().tab("Main").unwrap().groups.len(), 1);
    assert_eq!(instances[0].key, "Main_Table");
    assert_eq!(instances[0].selection_slot, None);
    assert_eq!(*redraws.borrow(), 1);

    engine
        .quick_update_layout(&models(&["m1"]), &DatasetSpec::new(), false)
        .unwrap();
    assert_eq!(*redraws.borrow(), 2);
}

#[test]
fn render_callback_is_replaced() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut engine = engine();

    engine.render_modules();

    {
        let calls = Rc::clone(&calls);
        engine.set_render_modules_callback(move || calls.borrow_mut().push("first"));
    }
    {
        let calls = Rc::clone(&calls);
        engine.set_render_modules_callback(move || calls.borrow_mut().push("second"));
    }
    engine.render_modules();

    assert_eq!(*calls.borrow(), vec!["second"]);
}

#[test]
fn observers_see_changes_in_order() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut engine = engine();
    let id = {
        let events = Rc::clone(&events);
        engine.subscribe(move |event| events.borrow_mut().push(event.clone()))
    };

    init(
        &mut engine,
        vec![TabLayout::new("Main", ["collapsed-module"])],
        &models(&["m1"]),
        false,
    );
    engine
        .quick_update_layout(&models(&["m1"]), &DatasetSpec::new(), false)
        .unwrap();
    engine.set_hidden_modules(["Main_Collapsed"]);
    engine.set_selected_tab(Some("Main".to_string()));
    engine.set_selected_tab(Some("Main".to_string()));

    assert_eq!(
        *events.borrow(),
        vec![
            LayoutEvent::DeclaredLayoutChanged,
            LayoutEvent::RenderLayoutChanged(UpdateKind::Full),
            LayoutEvent::HiddenModulesChanged,
            LayoutEvent::RenderLayoutChanged(UpdateKind::Quick),
            LayoutEvent::SelectedTabChanged {
                selected_tab: Some("Main".to_string())
            },
        ]
    );

    assert!(engine.unsubscribe(id));
    engine.set_selected_tab(None);
    assert_eq!(events.borrow().len(), 5);
    assert_eq!(engine.subscriber_count(), 0);
}

#[test]
fn url_configuration_replaces_hidden_and_selected_tab() {
    let mut engine = engine();
    init(
        &mut engine,
        vec![TabLayout::new("Main", ["table-module", "editor-module"])],
        &models(&["m1"]),
        false,
    );
    engine.set_hidden_modules(["Main_Table"]);

    let config = UrlConfiguration::from_query("hidden_modules=Main_Editor&tab=Main");
    engine.apply_url_configuration(&config);

    assert_eq!(
        engine.hidden_module_keys().iter().collect::<Vec<_>>(),
        vec!["Main_Editor"]
    );
    assert_eq!(engine.selected_tab(), Some("Main"));
    assert_eq!(engine.url_configuration(), config);
}

#[test]
fn settings_are_read_from_the_declared_layout() {
    let mut engine = engine();
    let declared = layout(vec![TabLayout::new("Main", ["table-module"])])
        .with_setting("main_height", serde_json::json!(45));
    engine
        .initialize_layout(declared, &ModelSpecs::new(), &DatasetSpec::new(), false)
        .unwrap();

    assert_eq!(engine.get_setting("main_height"), Some(&serde_json::json!(45)));
    assert_eq!(engine.get_setting("missing"), None);
}

#[test]
fn render_layout_snapshot() {
    let mut engine = LayoutEngine::with_builtin_modules();
    let tabs = vec![
        TabLayout::new("Main", ["data-table-module", "datapoint-editor-module"]),
        TabLayout::new("Predictions", ["classification-module", "scalar-module"]),
        TabLayout::new("Explanations", ["attention-module"]),
    ];
    init(&mut engine, tabs, &models(&["bert", "cnn"]), true);

    insta::assert_json_snapshot!(engine.render_layout(), @r#"
    {
      "Main": [
        [
          {
            "key": "Main_Data Table",
            "title": "Data Table",
            "model_name": null,
            "selection_slot": 0
          }
        ],
        [
          {
            "key": "Main_Datapoint Editor",
            "title": "Datapoint Editor",
            "model_name": null,
            "selection_slot": 1
          },
          {
            "key": "Main_Datapoint Editor",
            "title": "Datapoint Editor",
            "model_name": null,
            "selection_slot": 0
          }
        ]
      ],
      "Predictions": [
        [
          {
            "key": "Predictions_Classification Results",
            "title": "Classification Results",
            "model_name": null,
            "selection_slot": 1
          },
          {
            "key": "Predictions_Classification Results",
            "title": "Classification Results",
            "model_name": null,
            "selection_slot": 0
          }
        ],
        [
          {
            "key": "Predictions_Scalars",
            "title": "Scalars",
            "model_name": "bert",
            "selection_slot": 0
          },
          {
            "key": "Predictions_Scalars",
            "title": "Scalars",
            "model_name": "cnn",
            "selection_slot": 0
          }
        ]
      ]
    }
    "#);
}
