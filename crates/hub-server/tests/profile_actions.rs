// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod common;

use common::Harness;
use hub_common_ticket::{TeamId, ValidationCode};
use hub_server::{ActionError, PaginationParams};
use hub_server_auth::{ProfileFilter, ProfilePayload, Role, UserId};
use hub_server_db::ReferenceRepository;

#[tokio::test]
async fn only_administrators_list_profiles() {
	let (h, _) = Harness::with_recording().await;

	let all = h
		.actions
		.list_profiles(&h.dan, ProfileFilter::default(), PaginationParams::default())
		.await
		.unwrap();
	assert_eq!(all.len(), 4);

	for principal in [&h.alice, &h.bob] {
		let err = h
			.actions
			.list_profiles(principal, ProfileFilter::default(), PaginationParams::default())
			.await
			.unwrap_err();
		assert!(matches!(err, ActionError::Forbidden));
	}
}

#[tokio::test]
async fn profile_search_is_case_insensitive() {
	let (h, _) = Harness::with_recording().await;
	let found = h
		.actions
		.list_profiles(
			&h.dan,
			ProfileFilter {
				username: Some("CAR".to_string()),
			},
			PaginationParams::default(),
		)
		.await
		.unwrap();
	assert_eq!(found.len(), 1);
	assert_eq!(found[0].username, "carol");
}

#[tokio::test]
async fn view_is_self_or_administrator() {
	let (h, _) = Harness::with_recording().await;

	assert_eq!(h.actions.view_profile(&h.alice, h.alice.id).await.unwrap().username, "alice");
	assert_eq!(h.actions.view_profile(&h.dan, h.alice.id).await.unwrap().username, "alice");

	// Technicians are not elevated for profiles.
	let err = h.actions.view_profile(&h.bob, h.alice.id).await.unwrap_err();
	assert!(matches!(err, ActionError::Forbidden));

	let err = h.actions.view_profile(&h.dan, UserId::new(999)).await.unwrap_err();
	assert!(matches!(err, ActionError::NotFound(_)));
}

#[tokio::test]
async fn self_edit_changes_names_but_not_role() {
	let (h, _) = Harness::with_recording().await;
	let updated = h
		.actions
		.update_profile(
			&h.alice,
			h.alice.id,
			ProfilePayload {
				first_name: Some("Alicia".to_string()),
				role: Some(Role::Administrator),
				..Default::default()
			},
		)
		.await
		.unwrap();
	assert_eq!(updated.first_name, "Alicia");
	assert_eq!(updated.role, Role::Customer);
}

#[tokio::test]
async fn administrator_edits_role_and_team_but_not_names() {
	let (h, _) = Harness::with_recording().await;
	let team = ReferenceRepository::new(h.pool.clone())
		.create_team("Network")
		.await
		.unwrap();

	let updated = h
		.actions
		.update_profile(
			&h.dan,
			h.carol.id,
			ProfilePayload {
				first_name: Some("Caroline".to_string()),
				role: Some(Role::Technician),
				team: Some(Some(team.id)),
				..Default::default()
			},
		)
		.await
		.unwrap();
	assert_eq!(updated.first_name, "carol");
	assert_eq!(updated.role, Role::Technician);
	assert_eq!(updated.team, Some(team.id));
}

#[tokio::test]
async fn other_users_cannot_edit() {
	let (h, _) = Harness::with_recording().await;
	let err = h
		.actions
		.update_profile(
			&h.bob,
			h.alice.id,
			ProfilePayload {
				last_name: Some("Changed".to_string()),
				..Default::default()
			},
		)
		.await
		.unwrap_err();
	assert!(matches!(err, ActionError::Forbidden));
}

#[tokio::test]
async fn taken_username_is_a_validation_error() {
	let (h, _) = Harness::with_recording().await;
	let err = h
		.actions
		.update_profile(
			&h.carol,
			h.carol.id,
			ProfilePayload {
				username: Some("alice".to_string()),
				..Default::default()
			},
		)
		.await
		.unwrap_err();
	let ActionError::ValidationFailed(errors) = err else {
		panic!("expected validation failure");
	};
	assert!(errors.has_code("username", ValidationCode::UsernameTaken));
}

#[tokio::test]
async fn unknown_team_is_rejected() {
	let (h, _) = Harness::with_recording().await;
	let err = h
		.actions
		.update_profile(
			&h.dan,
			h.bob.id,
			ProfilePayload {
				team: Some(Some(TeamId::new(31))),
				..Default::default()
			},
		)
		.await
		.unwrap_err();
	let ActionError::ValidationFailed(errors) = err else {
		panic!("expected validation failure");
	};
	assert!(errors.has_code("team", ValidationCode::UnknownReference));
}
