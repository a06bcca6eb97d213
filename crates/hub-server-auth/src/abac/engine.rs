// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy evaluation entry point.

use super::policies::{profile, ticket};
use super::types::{Action, Decision, ResourceAttrs, ResourceType};
use crate::types::Principal;
use tracing::instrument;

/// Decide whether `principal` may perform `action` on `resource`.
///
/// Pure and side-effect free apart from logging. An action that does not
/// belong to the resource type (for example `DeleteTicket` against a
/// profile) is denied.
#[instrument(
	level = "debug",
	skip(principal, resource),
	fields(
		user_id = %principal.id,
		role = %principal.role,
		action = %action,
		resource_type = ?resource.resource_type,
	)
)]
pub fn authorize(principal: &Principal, action: Action, resource: &ResourceAttrs) -> Decision {
	let allowed = match resource.resource_type {
		ResourceType::Ticket => ticket::evaluate(principal, action, resource),
		ResourceType::Profile => profile::evaluate_profile(principal, action, resource),
		ResourceType::ProfileDirectory => profile::evaluate_directory(principal, action),
	};

	if allowed {
		tracing::debug!("access allowed");
	} else {
		tracing::info!(
			user_id = %principal.id,
			action = %action,
			resource_type = ?resource.resource_type,
			"access denied"
		);
	}
	Decision::from(allowed)
}

/// Boolean form of [`authorize`].
pub fn is_allowed(principal: &Principal, action: Action, resource: &ResourceAttrs) -> bool {
	authorize(principal, action, resource).is_allowed()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Role;
	use hub_common_ticket::UserId;
	use proptest::prelude::*;

	fn principal(id: i64, role: Role) -> Principal {
		Principal::new(UserId::new(id), format!("user{id}"), role)
	}

	fn role_strategy() -> impl Strategy<Value = Role> {
		prop_oneof![
			Just(Role::Administrator),
			Just(Role::Technician),
			Just(Role::Customer),
		]
	}

	mod routing {
		use super::*;

		#[test]
		fn ticket_actions_on_profiles_are_denied() {
			let admin = principal(1, Role::Administrator);
			let resource = ResourceAttrs::profile(UserId::new(1));
			assert_eq!(authorize(&admin, Action::DeleteTicket, &resource), Decision::Deny);
			assert_eq!(authorize(&admin, Action::ViewTicket, &resource), Decision::Deny);
		}

		#[test]
		fn profile_actions_on_tickets_are_denied() {
			let admin = principal(1, Role::Administrator);
			let resource = ResourceAttrs::ticket(UserId::new(1));
			assert_eq!(authorize(&admin, Action::EditProfile, &resource), Decision::Deny);
			assert_eq!(authorize(&admin, Action::ListAllProfiles, &resource), Decision::Deny);
		}
	}

	mod scenario {
		use super::*;

		#[test]
		fn alice_bob_carol_dan() {
			let alice = principal(1, Role::Customer);
			let bob = principal(2, Role::Technician);
			let carol = principal(3, Role::Customer);
			let dan = principal(4, Role::Administrator);
			let t1 = ResourceAttrs::ticket(alice.id);

			assert!(is_allowed(&alice, Action::ViewTicket, &t1));
			assert!(is_allowed(&bob, Action::ViewTicket, &t1));
			assert!(!is_allowed(&carol, Action::ViewTicket, &t1));
			assert!(is_allowed(&dan, Action::ViewTicket, &t1));

			assert!(!is_allowed(&alice, Action::DeleteTicket, &t1));
			assert!(!is_allowed(&carol, Action::DeleteTicket, &t1));
			assert!(is_allowed(&bob, Action::DeleteTicket, &t1));
		}
	}

	proptest! {
		#[test]
		fn view_and_edit_ticket_iff_author_or_elevated(
			role in role_strategy(),
			principal_id in 1i64..20,
			author_id in 1i64..20,
		) {
			let p = principal(principal_id, role);
			let resource = ResourceAttrs::ticket(UserId::new(author_id));
			let expected = principal_id == author_id || role.is_elevated();
			prop_assert_eq!(is_allowed(&p, Action::ViewTicket, &resource), expected);
			prop_assert_eq!(is_allowed(&p, Action::EditTicket, &resource), expected);
		}

		#[test]
		fn customers_never_delete_tickets(principal_id in 1i64..20, author_id in 1i64..20) {
			let p = principal(principal_id, Role::Customer);
			let resource = ResourceAttrs::ticket(UserId::new(author_id));
			prop_assert!(!is_allowed(&p, Action::DeleteTicket, &resource));
		}

		#[test]
		fn profile_access_iff_self_or_administrator(
			role in role_strategy(),
			principal_id in 1i64..20,
			profile_id in 1i64..20,
		) {
			let p = principal(principal_id, role);
			let resource = ResourceAttrs::profile(UserId::new(profile_id));
			let expected = principal_id == profile_id || role == Role::Administrator;
			prop_assert_eq!(is_allowed(&p, Action::ViewProfile, &resource), expected);
			prop_assert_eq!(is_allowed(&p, Action::EditProfile, &resource), expected);
		}

		#[test]
		fn directory_listing_iff_administrator(role in role_strategy(), principal_id in 1i64..20) {
			let p = principal(principal_id, role);
			prop_assert_eq!(
				is_allowed(&p, Action::ListAllProfiles, &ResourceAttrs::profile_directory()),
				role == Role::Administrator
			);
		}
	}
}
