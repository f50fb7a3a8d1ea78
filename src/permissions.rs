//! Role-based authorization for works, payments and the translator roster.
//!
//! Every rule is declared once in a capability table keyed by operation.
//! Evaluation is a pure function of the actor, the operation and, where a
//! rule depends on it, the ownership fields of the target.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::lifecycle::WorkItem;
use crate::payment::{Payment, PaymentStatus, WorkGroup};

/// Organizational titles. Older records store the Vietnamese role codes,
/// accepted here as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Superuser,
    #[serde(alias = "chu_nhiem")]
    Director,
    #[serde(alias = "pho_chu_nhiem")]
    DeputyDirector,
    #[serde(alias = "truong_ban_thu_ky")]
    HeadSecretary,
    #[serde(alias = "thu_ky_hop_phan")]
    ComponentSecretary,
    #[serde(alias = "van_phong")]
    Office,
    #[serde(alias = "ke_toan")]
    Accountant,
    #[serde(alias = "van_thu")]
    Clerk,
    #[serde(alias = "bien_tap_vien")]
    Editor,
    #[serde(alias = "ky_thuat_vien")]
    Technician,
    #[serde(alias = "dich_gia")]
    Translator,
    #[serde(alias = "chuyen_gia")]
    Expert,
    #[serde(alias = "phu_trach_nhan_su")]
    HrOfficer,
}

impl Role {
    pub const ALL: [Role; 13] = [
        Role::Superuser,
        Role::Director,
        Role::DeputyDirector,
        Role::HeadSecretary,
        Role::ComponentSecretary,
        Role::Office,
        Role::Accountant,
        Role::Clerk,
        Role::Editor,
        Role::Technician,
        Role::Translator,
        Role::Expert,
        Role::HrOfficer,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Role::Superuser => "superuser",
            Role::Director => "director",
            Role::DeputyDirector => "deputy_director",
            Role::HeadSecretary => "head_secretary",
            Role::ComponentSecretary => "component_secretary",
            Role::Office => "office",
            Role::Accountant => "accountant",
            Role::Clerk => "clerk",
            Role::Editor => "editor",
            Role::Technician => "technician",
            Role::Translator => "translator",
            Role::Expert => "expert",
            Role::HrOfficer => "hr_officer",
        }
    }

    fn legacy_code(&self) -> Option<&'static str> {
        match self {
            Role::Superuser => None,
            Role::Director => Some("chu_nhiem"),
            Role::DeputyDirector => Some("pho_chu_nhiem"),
            Role::HeadSecretary => Some("truong_ban_thu_ky"),
            Role::ComponentSecretary => Some("thu_ky_hop_phan"),
            Role::Office => Some("van_phong"),
            Role::Accountant => Some("ke_toan"),
            Role::Clerk => Some("van_thu"),
            Role::Editor => Some("bien_tap_vien"),
            Role::Technician => Some("ky_thuat_vien"),
            Role::Translator => Some("dich_gia"),
            Role::Expert => Some("chuyen_gia"),
            Role::HrOfficer => Some("phu_trach_nhan_su"),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.code() == s || r.legacy_code() == Some(s))
            .ok_or_else(|| format!("Unknown role: {s}"))
    }
}

/// Create, update and assign across works.
pub const MANAGER_ROLES: &[Role] = &[
    Role::Director,
    Role::DeputyDirector,
    Role::HeadSecretary,
    Role::ComponentSecretary,
];

/// Delete and approve works.
pub const SENIOR_ROLES: &[Role] = &[Role::Director, Role::DeputyDirector, Role::HeadSecretary];

/// An authenticated caller, as supplied by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), role }
    }

    pub fn is_superuser(&self) -> bool {
        self.role == Role::Superuser
    }

    fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

/// Requested actions on a work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    List,
    Retrieve,
    Board,
    Create,
    Update,
    PartialUpdate,
    Destroy,
    Approve,
    AssignTranslator,
    StartTrial,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::List,
        Operation::Retrieve,
        Operation::Board,
        Operation::Create,
        Operation::Update,
        Operation::PartialUpdate,
        Operation::Destroy,
        Operation::Approve,
        Operation::AssignTranslator,
        Operation::StartTrial,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Retrieve => "retrieve",
            Operation::Board => "board",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::PartialUpdate => "partial_update",
            Operation::Destroy => "destroy",
            Operation::Approve => "approve",
            Operation::AssignTranslator => "assign_translator",
            Operation::StartTrial => "start_trial",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.code() == s)
            .ok_or_else(|| format!("Unknown operation: {s}"))
    }
}

/// Who may perform an operation.
#[derive(Debug, Clone, Copy)]
enum Grant {
    /// Any authenticated actor.
    Anyone,
    Roles(&'static [Role]),
    /// Listed roles, or a translator acting on a work assigned to them.
    RolesOrAssignedTranslator(&'static [Role]),
    /// Superuser only.
    Nobody,
}

const WORK_CAPABILITIES: &[(Operation, Grant)] = &[
    (Operation::List, Grant::Anyone),
    (Operation::Retrieve, Grant::Anyone),
    (Operation::Board, Grant::Anyone),
    (Operation::Create, Grant::Roles(MANAGER_ROLES)),
    (Operation::Update, Grant::RolesOrAssignedTranslator(MANAGER_ROLES)),
    (
        Operation::PartialUpdate,
        Grant::RolesOrAssignedTranslator(MANAGER_ROLES),
    ),
    (Operation::Destroy, Grant::Roles(SENIOR_ROLES)),
    (Operation::Approve, Grant::Roles(SENIOR_ROLES)),
    (Operation::AssignTranslator, Grant::Roles(MANAGER_ROLES)),
    (Operation::StartTrial, Grant::Nobody),
];

/// Authorization decisions. Stateless; call it on every request.
pub struct PermissionEvaluator;

impl PermissionEvaluator {
    /// May `actor` perform `operation`, optionally on a specific `work`?
    ///
    /// Ownership-gated rules need the work; without one they only pass on
    /// the role list.
    pub fn can_perform(actor: &Actor, operation: Operation, work: Option<&WorkItem>) -> bool {
        if actor.is_superuser() {
            return true;
        }

        let grant = WORK_CAPABILITIES
            .iter()
            .find(|(op, _)| *op == operation)
            .map(|(_, grant)| *grant)
            .unwrap_or(Grant::Nobody);

        match grant {
            Grant::Anyone => true,
            Grant::Roles(roles) => actor.has_role(roles),
            Grant::RolesOrAssignedTranslator(roles) => {
                actor.has_role(roles)
                    || (actor.role == Role::Translator
                        && work
                            .and_then(|w| w.translator.as_deref())
                            .is_some_and(|t| t == actor.id))
            }
            Grant::Nobody => false,
        }
    }

    /// May `actor` perform `operation` on payments? See [`PaymentOperation`].
    ///
    /// For `create`, `payment` is the requested payment; without it the
    /// requested group and category are unknown and creation is denied.
    /// A `policy` only counts when it is active and configured for the
    /// payment's work group and category.
    pub fn can_perform_payment(
        actor: &Actor,
        operation: PaymentOperation,
        payment: Option<&Payment>,
        policy: Option<&CategoryPolicy>,
    ) -> bool {
        if actor.is_superuser() {
            return true;
        }

        let policy = policy.filter(|p| payment.is_some_and(|pay| p.applies_to(pay)));
        let policy_allows =
            |roles: Option<&Vec<Role>>| roles.is_some_and(|r| r.contains(&actor.role));

        match operation {
            PaymentOperation::List => true,
            PaymentOperation::Retrieve => {
                actor.has_role(PAYMENT_OVERSIGHT_ROLES)
                    || payment.is_some_and(|p| {
                        p.recipient.as_deref() == Some(actor.id.as_str())
                            || p.requested_by.as_deref() == Some(actor.id.as_str())
                    })
                    || policy_allows(policy.map(|p| &p.view_roles))
            }
            PaymentOperation::Create => policy_allows(policy.map(|p| &p.create_roles)),
            PaymentOperation::Approve | PaymentOperation::Reject => {
                actor.has_role(PAYMENT_APPROVER_ROLES)
                    || policy_allows(policy.map(|p| &p.approve_roles))
            }
            PaymentOperation::Update => {
                payment.is_some_and(|p| p.requested_by.as_deref() == Some(actor.id.as_str()))
                    || actor.has_role(PAYMENT_OVERSIGHT_ROLES)
            }
            PaymentOperation::Destroy => actor.has_role(SENIOR_ROLES),
            PaymentOperation::MarkPaid => {
                actor.role == Role::Accountant
                    && payment.is_none_or(|p| p.status == PaymentStatus::Approved)
            }
        }
    }

    /// Roster management is all-or-nothing: managers get every operation,
    /// everyone else none.
    pub fn can_manage_translators(actor: &Actor, _operation: TranslatorOperation) -> bool {
        actor.is_superuser() || actor.has_role(MANAGER_ROLES)
    }
}

/// See every payment and edit any of them.
const PAYMENT_OVERSIGHT_ROLES: &[Role] = &[
    Role::Accountant,
    Role::Director,
    Role::DeputyDirector,
    Role::HeadSecretary,
];

/// Approve or reject any payment regardless of category.
const PAYMENT_APPROVER_ROLES: &[Role] = &[Role::Accountant, Role::Director, Role::DeputyDirector];

/// Requested actions on a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOperation {
    List,
    Retrieve,
    Create,
    Update,
    Destroy,
    Approve,
    Reject,
    MarkPaid,
}

/// Requested actions on the translator roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslatorOperation {
    List,
    Retrieve,
    Create,
    Update,
    Destroy,
}

/// Role lists configured for one payment category of one work group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPolicy {
    pub work_group: WorkGroup,
    pub category_code: String,
    #[serde(default = "default_policy_active")]
    pub active: bool,
    #[serde(default)]
    pub view_roles: Vec<Role>,
    #[serde(default)]
    pub create_roles: Vec<Role>,
    #[serde(default)]
    pub approve_roles: Vec<Role>,
}

fn default_policy_active() -> bool {
    true
}

impl CategoryPolicy {
    /// Active policy with empty role lists.
    pub fn new(work_group: WorkGroup, category_code: impl Into<String>) -> Self {
        Self {
            work_group,
            category_code: category_code.into(),
            active: true,
            view_roles: Vec::new(),
            create_roles: Vec::new(),
            approve_roles: Vec::new(),
        }
    }

    /// Active and configured for this payment's group and category.
    pub fn applies_to(&self, payment: &Payment) -> bool {
        self.active
            && self.work_group == payment.work_group
            && self.category_code == payment.category_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{Payment, WorkGroup};

    fn actor(role: Role) -> Actor {
        Actor::new("u-1", role)
    }

    fn expected(role: Role, op: Operation) -> bool {
        let manager = MANAGER_ROLES.contains(&role);
        let senior = SENIOR_ROLES.contains(&role);
        match op {
            _ if role == Role::Superuser => true,
            Operation::List | Operation::Retrieve | Operation::Board => true,
            Operation::Create | Operation::AssignTranslator => manager,
            Operation::Update | Operation::PartialUpdate => manager,
            Operation::Destroy | Operation::Approve => senior,
            Operation::StartTrial => false,
        }
    }

    #[test]
    fn full_matrix_without_ownership() {
        for role in Role::ALL {
            for op in Operation::ALL {
                assert_eq!(
                    PermissionEvaluator::can_perform(&actor(role), op, None),
                    expected(role, op),
                    "{role} / {op}"
                );
            }
        }
    }

    #[test]
    fn component_secretary_creates_but_cannot_approve() {
        let secretary = actor(Role::ComponentSecretary);
        assert!(PermissionEvaluator::can_perform(&secretary, Operation::Create, None));
        assert!(PermissionEvaluator::can_perform(&secretary, Operation::AssignTranslator, None));
        assert!(!PermissionEvaluator::can_perform(&secretary, Operation::Approve, None));
        assert!(!PermissionEvaluator::can_perform(&secretary, Operation::Destroy, None));
    }

    #[test]
    fn translator_updates_only_assigned_work() {
        let mut work = WorkItem::new("Phủ biên tạp lục");
        work.translator = Some("T1".into());

        let owner = Actor::new("T1", Role::Translator);
        let other = Actor::new("T2", Role::Translator);

        assert!(PermissionEvaluator::can_perform(&owner, Operation::Update, Some(&work)));
        assert!(PermissionEvaluator::can_perform(&owner, Operation::PartialUpdate, Some(&work)));
        assert!(!PermissionEvaluator::can_perform(&other, Operation::Update, Some(&work)));
        assert!(!PermissionEvaluator::can_perform(&owner, Operation::Destroy, Some(&work)));
        assert!(!PermissionEvaluator::can_perform(&owner, Operation::AssignTranslator, Some(&work)));
    }

    #[test]
    fn matching_id_without_translator_role_is_not_ownership() {
        let mut work = WorkItem::new("Vân đài loại ngữ");
        work.translator = Some("u-5".into());
        let editor = Actor::new("u-5", Role::Editor);
        assert!(!PermissionEvaluator::can_perform(&editor, Operation::Update, Some(&work)));
    }

    #[test]
    fn translator_without_assignment_is_denied() {
        let work = WorkItem::new("Unassigned");
        let translator = Actor::new("T1", Role::Translator);
        assert!(!PermissionEvaluator::can_perform(&translator, Operation::Update, Some(&work)));
    }

    #[test]
    fn roles_parse_from_new_and_legacy_codes() {
        assert_eq!("director".parse::<Role>().unwrap(), Role::Director);
        assert_eq!("dich_gia".parse::<Role>().unwrap(), Role::Translator);
        assert!("janitor".parse::<Role>().is_err());
        let role: Role = serde_json::from_str("\"ke_toan\"").unwrap();
        assert_eq!(role, Role::Accountant);
        assert_eq!(serde_json::to_string(&Role::Accountant).unwrap(), "\"accountant\"");
    }

    #[test]
    fn operations_parse_from_codes() {
        for op in Operation::ALL {
            assert_eq!(op.code().parse::<Operation>().unwrap(), op);
        }
    }

    fn payment(requested_by: &str, recipient: &str) -> Payment {
        let mut p = Payment::new(WorkGroup::Translation, "trial_fee", 1_500_000);
        p.requested_by = Some(requested_by.into());
        p.recipient = Some(recipient.into());
        p
    }

    #[test]
    fn mark_paid_needs_accountant_and_approved_payment() {
        let accountant = actor(Role::Accountant);
        let mut p = payment("u-2", "u-3");
        assert!(!PermissionEvaluator::can_perform_payment(
            &accountant,
            PaymentOperation::MarkPaid,
            Some(&p),
            None
        ));
        p.approve("u-9", chrono::NaiveDate::from_ymd_opt(2024, 5, 2).unwrap())
            .unwrap();
        assert!(PermissionEvaluator::can_perform_payment(
            &accountant,
            PaymentOperation::MarkPaid,
            Some(&p),
            None
        ));
        assert!(!PermissionEvaluator::can_perform_payment(
            &actor(Role::Director),
            PaymentOperation::MarkPaid,
            Some(&p),
            None
        ));
    }

    #[test]
    fn payment_visibility_follows_parties_and_policy() {
        let p = payment("u-2", "u-3");
        let clerk_requester = Actor::new("u-2", Role::Clerk);
        let clerk_recipient = Actor::new("u-3", Role::Clerk);
        let clerk_other = Actor::new("u-4", Role::Clerk);
        let policy = CategoryPolicy {
            view_roles: vec![Role::Office],
            ..CategoryPolicy::new(WorkGroup::Translation, "trial_fee")
        };

        let can_view = |a: &Actor, policy: Option<&CategoryPolicy>| {
            PermissionEvaluator::can_perform_payment(a, PaymentOperation::Retrieve, Some(&p), policy)
        };
        assert!(can_view(&clerk_requester, None));
        assert!(can_view(&clerk_recipient, None));
        assert!(!can_view(&clerk_other, None));
        assert!(can_view(&actor(Role::Office), Some(&policy)));
        assert!(can_view(&actor(Role::HeadSecretary), None));
    }

    #[test]
    fn payment_create_and_approve_use_category_policy() {
        let policy = CategoryPolicy {
            create_roles: vec![Role::ComponentSecretary],
            approve_roles: vec![Role::HeadSecretary],
            ..CategoryPolicy::new(WorkGroup::Translation, "trial_fee")
        };
        let requested = payment("u-2", "u-3");
        let secretary = actor(Role::ComponentSecretary);
        let head = actor(Role::HeadSecretary);
        let check = |a: &Actor, op, p: Option<&Payment>, policy: Option<&CategoryPolicy>| {
            PermissionEvaluator::can_perform_payment(a, op, p, policy)
        };

        assert!(check(&secretary, PaymentOperation::Create, Some(&requested), Some(&policy)));
        assert!(!check(&secretary, PaymentOperation::Create, Some(&requested), None));
        assert!(!check(&secretary, PaymentOperation::Create, None, Some(&policy)));
        assert!(!check(&head, PaymentOperation::Approve, Some(&requested), None));
        assert!(check(&head, PaymentOperation::Reject, Some(&requested), Some(&policy)));
        assert!(check(&actor(Role::Accountant), PaymentOperation::Approve, None, None));
    }

    #[test]
    fn policy_for_another_category_grants_nothing() {
        let requested = payment("u-2", "u-3");
        let head = actor(Role::HeadSecretary);
        let office = actor(Role::Office);
        let grant_all = |policy: CategoryPolicy| CategoryPolicy {
            view_roles: vec![Role::Office],
            create_roles: vec![Role::HeadSecretary],
            approve_roles: vec![Role::HeadSecretary],
            ..policy
        };

        let other_category = grant_all(CategoryPolicy::new(WorkGroup::Translation, "royalty"));
        let other_group = grant_all(CategoryPolicy::new(WorkGroup::Editing, "trial_fee"));
        let inactive = CategoryPolicy {
            active: false,
            ..grant_all(CategoryPolicy::new(WorkGroup::Translation, "trial_fee"))
        };

        for policy in [&other_category, &other_group, &inactive] {
            for op in [
                PaymentOperation::Create,
                PaymentOperation::Approve,
                PaymentOperation::Reject,
            ] {
                let allowed = PermissionEvaluator::can_perform_payment(
                    &head,
                    op,
                    Some(&requested),
                    Some(policy),
                );
                assert!(!allowed, "{op:?} with {policy:?}");
            }
            assert!(!PermissionEvaluator::can_perform_payment(
                &office,
                PaymentOperation::Retrieve,
                Some(&requested),
                Some(policy)
            ));
        }

        let matching = grant_all(CategoryPolicy::new(WorkGroup::Translation, "trial_fee"));
        assert!(PermissionEvaluator::can_perform_payment(
            &head,
            PaymentOperation::Approve,
            Some(&requested),
            Some(&matching)
        ));
    }

    #[test]
    fn policy_reads_with_active_default() {
        let policy: CategoryPolicy = serde_json::from_str(
            r#"{"work_group": "dich_thuat", "category_code": "trial_fee",
                "approve_roles": ["truong_ban_thu_ky"]}"#,
        )
        .unwrap();
        assert!(policy.active);
        assert_eq!(policy.work_group, WorkGroup::Translation);
        assert_eq!(policy.approve_roles, vec![Role::HeadSecretary]);
    }

    #[test]
    fn translator_roster_is_manager_only() {
        for role in Role::ALL {
            let allowed = role == Role::Superuser || MANAGER_ROLES.contains(&role);
            for op in [
                TranslatorOperation::List,
                TranslatorOperation::Retrieve,
                TranslatorOperation::Create,
                TranslatorOperation::Update,
                TranslatorOperation::Destroy,
            ] {
                assert_eq!(
                    PermissionEvaluator::can_manage_translators(&actor(role), op),
                    allowed,
                    "{role} / {op:?}"
                );
            }
        }
    }

    #[test]
    fn payment_update_and_destroy() {
        let p = payment("u-2", "u-3");
        assert!(PermissionEvaluator::can_perform_payment(
            &Actor::new("u-2", Role::Clerk),
            PaymentOperation::Update,
            Some(&p),
            None
        ));
        assert!(PermissionEvaluator::can_perform_payment(
            &actor(Role::Accountant),
            PaymentOperation::Update,
            Some(&p),
            None
        ));
        assert!(!PermissionEvaluator::can_perform_payment(
            &actor(Role::Accountant),
            PaymentOperation::Destroy,
            Some(&p),
            None
        ));
        assert!(PermissionEvaluator::can_perform_payment(
            &actor(Role::Superuser),
            PaymentOperation::Destroy,
            Some(&p),
            None
        ));
    }
}
