#![allow(clippy::unwrap_used, clippy::expect_used)]
//! End-to-end loop query scenarios against the in-memory query engine.
//!
//! Each test runs the rewrite the way the kernel does: the rewrite issues
//! the organic query itself, then the kernel executes the rewritten args.

use related_items::rewrite::rewrite_query_args;
use related_items::settings::{FIELD_KEY, PLACEMENT_KEY};
use related_items_sdk::prelude::*;
use related_items_test_utils::{
    InMemoryContent, StaticRelations, TestItem, init_tracing, item_id, item_ids, test_item,
};
use uuid::Uuid;

const FIELD: &str = "field_related";

fn blog(n: u128, created: i64) -> TestItem {
    test_item("blog", &format!("Blog {n}"))
        .with_id(item_id(n))
        .created_at(created)
}

fn page(n: u128, created: i64) -> TestItem {
    test_item("page", &format!("Page {n}"))
        .with_id(item_id(n))
        .created_at(created)
}

/// Blog items 1..=5 (1 newest), pages 10 and 20.
fn site() -> InMemoryContent {
    InMemoryContent::new(vec![
        blog(1, 500),
        blog(2, 400),
        blog(3, 300),
        blog(4, 200),
        blog(5, 100),
        page(10, 50),
        page(20, 40),
    ])
}

fn listing(placement: &str) -> LoopQueryArgs {
    LoopQueryArgs {
        settings: Some(
            ModuleSettings::default()
                .with(PLACEMENT_KEY, placement)
                .with(FIELD_KEY, FIELD),
        ),
        item_type: Some(ItemTypeFilter::One("blog".into())),
        orderby: Some(OrderBy::Date),
        order: Some(SortOrder::Desc),
        per_page: Some(10.into()),
        ..Default::default()
    }
}

/// Rewrite `args`, then execute the result like the kernel would.
fn render(
    args: LoopQueryArgs,
    relations: &StaticRelations,
    content: &InMemoryContent,
) -> Vec<ItemId> {
    let rewritten = rewrite_query_args(args, relations, content).unwrap();
    content.query_ids(&rewritten).unwrap()
}

#[test]
fn related_pages_lead_the_blog_listing() {
    init_tracing();
    let content = site();
    let relations = StaticRelations::new().with_ids(FIELD, &item_ids(&[20, 10]));

    let shown = render(listing("before"), &relations, &content);
    assert_eq!(shown, item_ids(&[20, 10, 1, 2, 3, 4, 5]));
}

#[test]
fn related_pages_trail_the_blog_listing() {
    let content = site();
    let relations = StaticRelations::new().with_ids(FIELD, &item_ids(&[20, 10]));

    let shown = render(listing("after"), &relations, &content);
    assert_eq!(shown, item_ids(&[1, 2, 3, 4, 5, 20, 10]));
}

#[test]
fn related_blog_item_is_not_shown_twice() {
    let content = site();
    let relations = StaticRelations::new().with_ids(FIELD, &item_ids(&[3]));

    assert_eq!(
        render(listing("before"), &relations, &content),
        item_ids(&[3, 1, 2, 4, 5])
    );
    assert_eq!(
        render(listing("after"), &relations, &content),
        item_ids(&[1, 2, 4, 5, 3])
    );
}

#[test]
fn page_size_applies_to_the_merged_list() {
    let content = site();
    let relations = StaticRelations::new().with_ids(FIELD, &item_ids(&[10]));
    let args = LoopQueryArgs {
        per_page: Some(3.into()),
        ..listing("before")
    };

    let shown = render(args, &relations, &content);
    assert_eq!(shown, item_ids(&[10, 1, 2]));

    // The organic pass ignored paging and saw every blog item.
    let organic = &content.executed()[0];
    assert!(organic.is_unpaged());
}

#[test]
fn unpublished_related_item_is_dropped_by_the_engine() {
    let content = InMemoryContent::new(vec![
        blog(1, 500),
        blog(2, 400),
        page(10, 50).unpublished(),
    ]);
    let relations = StaticRelations::new().with_ids(FIELD, &item_ids(&[10]));

    let shown = render(listing("before"), &relations, &content);
    assert_eq!(shown, item_ids(&[1, 2]));
}

#[test]
fn module_filters_shape_only_the_organic_part() {
    let muted_author = Uuid::from_u128(900);
    let term = Uuid::from_u128(800);
    let content = InMemoryContent::new(vec![
        blog(1, 500).with_category(term),
        blog(2, 400).with_category(term).with_author(muted_author),
        blog(3, 300),
        page(10, 50).with_author(muted_author),
    ]);
    let relations = StaticRelations::new().with_ids(FIELD, &item_ids(&[10]));
    let args = LoopQueryArgs {
        author_not_in: Some(vec![muted_author]),
        tax_query: Some(serde_json::json!([term.to_string()])),
        ..listing("after")
    };

    let shown = render(args, &relations, &content);
    assert_eq!(shown, item_ids(&[1, 10]));
}

#[test]
fn existing_exclusions_still_apply_to_organic_results() {
    let content = site();
    let relations = StaticRelations::new().with_ids(FIELD, &item_ids(&[10]));
    let args = LoopQueryArgs {
        item_not_in: Some(item_ids(&[2, 4])),
        ..listing("before")
    };

    let shown = render(args, &relations, &content);
    assert_eq!(shown, item_ids(&[10, 1, 3, 5]));
}

#[test]
fn record_refs_in_the_relation_field() {
    let content = site();
    let relations = StaticRelations::new().with_value(
        FIELD,
        serde_json::json!([
            {"target_id": item_id(20).to_string(), "target_type": "item"},
            {"target_id": item_id(10).to_string(), "target_type": "item"}
        ]),
    );

    let shown = render(listing("before"), &relations, &content);
    assert_eq!(&shown[..2], &item_ids(&[20, 10])[..]);
}

#[test]
fn disabled_module_issues_one_query() {
    let content = site();
    let relations = StaticRelations::new().with_ids(FIELD, &item_ids(&[10]));

    let shown = render(listing("none"), &relations, &content);
    assert_eq!(shown, item_ids(&[1, 2, 3, 4, 5]));
    assert_eq!(content.executed().len(), 1);
}
