use std::collections::HashSet;

use aisle_domain::{
	HistoryError, MAX_EXPANDED, MAX_HANDLE_BYTES, MAX_VIEWED, ViewedHandles, clamp_limit,
	list_history, record_view,
};

fn handles(values: &[&str]) -> ViewedHandles {
	ViewedHandles::from_untrusted(values.iter().copied())
}

fn assert_invariants(list: &ViewedHandles) {
	let unique: HashSet<&String> = list.as_slice().iter().collect();

	assert!(list.len() <= MAX_VIEWED, "List exceeded bound: {}", list.len());
	assert_eq!(unique.len(), list.len(), "List contains duplicates: {list:?}");
}

#[test]
fn records_into_empty_history() {
	let result = record_view(Some(ViewedHandles::new()), "red-shoe").expect("Record failed.");

	assert_eq!(result.as_slice(), ["red-shoe"]);

	let from_absent = record_view(None, "red-shoe").expect("Record failed.");

	assert_eq!(from_absent, result);
}

#[test]
fn moves_existing_handle_to_front() {
	let result =
		record_view(Some(handles(&["red-shoe", "blue-hat"])), "blue-hat").expect("Record failed.");

	assert_eq!(result.as_slice(), ["blue-hat", "red-shoe"]);
}

#[test]
fn evicts_oldest_past_bound() {
	let mut list = ViewedHandles::new();

	for i in 1..=61 {
		list.record(&format!("h{i}")).expect("Record failed.");
	}

	let expected: Vec<String> = (2..=61).rev().map(|i| format!("h{i}")).collect();

	assert_eq!(list.len(), MAX_VIEWED);
	assert_eq!(list.as_slice(), expected.as_slice());
	assert!(!list.as_slice().contains(&"h1".to_string()));
}

#[test]
fn recording_twice_equals_recording_once() {
	let base = handles(&["a", "b", "c"]);
	let once = record_view(Some(base.clone()), "b").expect("Record failed.");
	let twice = record_view(Some(once.clone()), "b").expect("Record failed.");

	assert_eq!(once, twice);
}

#[test]
fn keeps_invariants_across_mixed_sequences() {
	let mut list = ViewedHandles::new();

	for step in 0..500_u32 {
		// Revisit older handles often enough to exercise dedup and reordering.
		let handle = format!("item-{}", (step * 7919) % 83);

		list.record(&handle).expect("Record failed.");

		assert_eq!(list.as_slice()[0], handle);
		assert_invariants(&list);
	}
}

#[test]
fn rejects_blank_handle() {
	let err = record_view(Some(handles(&["a"])), "   ").expect_err("Blank handle must fail.");

	assert_eq!(err, HistoryError::MissingHandle);
	assert_eq!(err.field(), "handle");
	assert_eq!(err.to_string(), "Missing handle");
}

#[test]
fn rejects_oversized_handle() {
	let longest = "h".repeat(MAX_HANDLE_BYTES);
	let result = record_view(None, &longest).expect("Handle at the limit must be accepted.");

	assert_eq!(result.as_slice(), [longest.as_str()]);

	let err = record_view(Some(result.clone()), &"h".repeat(10_000))
		.expect_err("Oversized handle must fail.");

	assert_eq!(err, HistoryError::HandleTooLong);
	assert_eq!(err.field(), "handle");

	// Multi-byte characters count by encoded length.
	let err = record_view(None, &"é".repeat(MAX_HANDLE_BYTES / 2 + 1))
		.expect_err("Oversized handle must fail.");

	assert_eq!(err, HistoryError::HandleTooLong);
}

#[test]
fn untrusted_lists_drop_oversized_handles() {
	let list = ViewedHandles::from_untrusted([
		"a".to_string(),
		"x".repeat(MAX_HANDLE_BYTES + 1),
		"b".to_string(),
	]);

	assert_eq!(list.as_slice(), ["a", "b"]);
}

#[test]
fn evicts_oldest_on_demand() {
	let mut list = handles(&["c", "b", "a"]);

	assert_eq!(list.evict_oldest().as_deref(), Some("a"));
	assert_eq!(list.as_slice(), ["c", "b"]);
	assert_eq!(ViewedHandles::new().evict_oldest(), None);
}

#[test]
fn trims_recorded_handle() {
	let result = record_view(Some(handles(&["a"])), "  a ").expect("Record failed.");

	assert_eq!(result.as_slice(), ["a"]);
}

#[test]
fn normalizes_untrusted_lists() {
	let mut raw: Vec<String> = vec!["a".into(), "".into(), "b".into(), "a".into(), " c ".into()];

	raw.extend((0..100).map(|i| format!("x{i}")));

	let list = ViewedHandles::from_untrusted(raw);

	assert_eq!(&list.as_slice()[..3], ["a", "b", "c"]);
	assert_invariants(&list);
	assert_eq!(list.len(), MAX_VIEWED);
}

#[test]
fn lists_clamped_prefix_without_mutation() {
	let list = handles(&["a", "b", "c"]);

	assert_eq!(list.list(2).as_slice(), ["a", "b"]);
	assert_eq!(list.list(0).as_slice(), ["a"]);
	assert_eq!(list.list(1_000).as_slice(), ["a", "b", "c"]);
	assert_eq!(list.as_slice(), ["a", "b", "c"]);
	assert!(list_history(None, 10).is_empty());
	assert_eq!(list_history(Some(&list), 1).as_slice(), ["a"]);
}

#[test]
fn parses_limits() {
	assert_eq!(clamp_limit(None), 60);
	assert_eq!(clamp_limit(Some("abc")), 60);
	assert_eq!(clamp_limit(Some("0")), 1);
	assert_eq!(clamp_limit(Some("12")), 12);
	assert_eq!(clamp_limit(Some("600")), 60);
}

#[test]
fn caps_expandable_prefix() {
	let list = ViewedHandles::from_untrusted((0..40).map(|i| format!("p{i}")));

	assert_eq!(list.expandable().len(), MAX_EXPANDED);
	assert_eq!(list.expandable()[0], "p0");
	assert_eq!(list.expandable()[24], "p24");
	assert_eq!(handles(&["a", "b"]).expandable(), ["a", "b"]);
}

#[test]
fn deserializes_through_normalization() {
	let list: ViewedHandles =
		serde_json::from_str(r#"["a","a","b"]"#).expect("Failed to parse handles.");

	assert_eq!(list.as_slice(), ["a", "b"]);
	assert_eq!(serde_json::to_string(&list).expect("Failed to render handles."), r#"["a","b"]"#);
}
