use crate::errors::AppResult;
use crate::models::Role;
use crate::services::api::ApiClient;
use crate::services::session::Session;

/// Every navigable destination of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Courts,
    Login,
    Profile,
    MyPendingBookings,
    Announcements,
    ApprovedBookings,
    ConfirmedBookings,
    Payment(String),
    PaymentHistory,
    AdminOverview,
    ManageCourts,
    ManageBookingApprovals,
    ManageMembers,
    ManageUsers,
    ManageBookings,
    ManageCoupons,
    MakeAnnouncement,
}

const EVERYONE: &[Role] = &[Role::User, Role::Member, Role::Admin];
const MEMBERS: &[Role] = &[Role::Member];
const ADMINS: &[Role] = &[Role::Admin];

impl Route {
    /// Roles whose dashboards show this route; `None` for public pages.
    pub fn audience(&self) -> Option<&'static [Role]> {
        match self {
            Route::Home | Route::Courts | Route::Login => None,
            Route::Profile | Route::MyPendingBookings | Route::Announcements => Some(EVERYONE),
            Route::ApprovedBookings
            | Route::ConfirmedBookings
            | Route::Payment(_)
            | Route::PaymentHistory => Some(MEMBERS),
            Route::AdminOverview
            | Route::ManageCourts
            | Route::ManageBookingApprovals
            | Route::ManageMembers
            | Route::ManageUsers
            | Route::ManageBookings
            | Route::ManageCoupons
            | Route::MakeAnnouncement => Some(ADMINS),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Courts => "Courts",
            Route::Login => "Login",
            Route::Profile => "My Profile",
            Route::MyPendingBookings => "Pending Bookings",
            Route::Announcements => "Announcements",
            Route::ApprovedBookings => "Approved Bookings",
            Route::ConfirmedBookings => "Confirmed Bookings",
            Route::Payment(_) => "Payment",
            Route::PaymentHistory => "Payment History",
            Route::AdminOverview => "Overview",
            Route::ManageCourts => "Manage Courts",
            Route::ManageBookingApprovals => "Manage Bookings Approval",
            Route::ManageMembers => "Manage Members",
            Route::ManageUsers => "All Users",
            Route::ManageBookings => "Manage Bookings",
            Route::ManageCoupons => "Manage Coupons",
            Route::MakeAnnouncement => "Make Announcement",
        }
    }
}

/// Dashboard sidebar entries for a resolved role.
pub fn nav_items(role: Role) -> Vec<Route> {
    match role {
        Role::User => vec![Route::Profile, Route::MyPendingBookings, Route::Announcements],
        Role::Member => vec![
            Route::Profile,
            Route::MyPendingBookings,
            Route::ApprovedBookings,
            Route::ConfirmedBookings,
            Route::PaymentHistory,
            Route::Announcements,
        ],
        Role::Admin => vec![
            Route::Profile,
            Route::AdminOverview,
            Route::ManageCourts,
            Route::ManageBookingApprovals,
            Route::ManageMembers,
            Route::ManageUsers,
            Route::ManageBookings,
            Route::ManageCoupons,
            Route::MakeAnnouncement,
        ],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleState {
    Unresolved,
    SignedOut,
    Resolved(Role),
}

/// Decides which affordances to show. Hiding is all it does: the backend
/// authorizes every request on its own.
#[derive(Debug, Clone)]
pub struct AccessGate {
    state: RoleState,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self {
            state: RoleState::Unresolved,
        }
    }
}

impl AccessGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolved(role: Role) -> Self {
        Self {
            state: RoleState::Resolved(role),
        }
    }

    /// One role lookup for the signed-in email. A failed lookup leaves the
    /// gate unresolved.
    pub async fn resolve(&mut self, api: &ApiClient, session: Option<&Session>) -> AppResult<RoleState> {
        let Some(session) = session else {
            self.state = RoleState::SignedOut;
            return Ok(self.state);
        };
        self.state = RoleState::Unresolved;
        let role = api.role(&session.email).await?;
        tracing::debug!(email = %session.email, %role, "role resolved");
        self.state = RoleState::Resolved(role);
        Ok(self.state)
    }

    pub fn state(&self) -> RoleState {
        self.state
    }

    pub fn role(&self) -> Option<Role> {
        match self.state {
            RoleState::Resolved(role) => Some(role),
            _ => None,
        }
    }

    /// Empty until the role is known, never a default menu.
    pub fn nav_items(&self) -> Vec<Route> {
        self.role().map(nav_items).unwrap_or_default()
    }

    pub fn can_view(&self, route: &Route) -> bool {
        match route.audience() {
            None => true,
            Some(audience) => self.role().is_some_and(|role| audience.contains(&role)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_gate_shows_nothing() {
        let gate = AccessGate::new();
        assert!(gate.nav_items().is_empty());
        assert!(!gate.can_view(&Route::Profile));
        assert!(gate.can_view(&Route::Courts));
    }

    #[test]
    fn test_member_sees_payment_routes() {
        let gate = AccessGate::resolved(Role::Member);
        assert!(gate.can_view(&Route::Payment("b1".into())));
        assert!(gate.can_view(&Route::PaymentHistory));
        assert!(!gate.can_view(&Route::ManageCoupons));
        assert!(gate.nav_items().contains(&Route::ApprovedBookings));
    }

    #[test]
    fn test_user_cannot_see_member_or_admin_routes() {
        let gate = AccessGate::resolved(Role::User);
        assert!(gate.can_view(&Route::MyPendingBookings));
        assert!(!gate.can_view(&Route::ApprovedBookings));
        assert!(!gate.can_view(&Route::ManageBookingApprovals));
    }

    #[test]
    fn test_admin_nav() {
        let gate = AccessGate::resolved(Role::Admin);
        let items = gate.nav_items();
        assert_eq!(items.first(), Some(&Route::Profile));
        assert!(items.contains(&Route::ManageBookingApprovals));
        assert!(!items.contains(&Route::PaymentHistory));
        assert!(items.iter().all(|r| gate.can_view(r)));
    }
}
