//! Route guard: pure access decisions over [`AuthState`].
//!
//! The guard never performs I/O. Callers map their location to a
//! [`Route`], call [`evaluate`] with the current state, and act on the
//! returned [`RouteDecision`]. Because decisions are pure they are trivially
//! table-testable for every role/route combination.

use byteme_core::{AdminId, AdminRole};

use crate::auth::AuthState;

/// A navigable surface of the admin console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Landing page with the portal chooser.
    Landing,
    GeneralAdminLogin,
    GeneralAdminRegister,
    MultiVendorAdminLogin,
    MultiVendorAdminRegister,
    ForgotPassword,
    ResetPassword,
    /// Shared dashboard. Renders for both roles; the backend scopes the
    /// data to the caller.
    Dashboard,
    Vendors,
    Customers,
    Orders,
    Settings,
    /// Per-admin multi-vendor view, `/mv/:adminId`.
    MultiVendorDashboard(AdminId),
}

impl Route {
    /// Parse a location path into a route. Unknown paths are `None`;
    /// the caller decides how to render a not-found surface.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
        match trimmed {
            "/" => Some(Self::Landing),
            "/general-admin-login" => Some(Self::GeneralAdminLogin),
            "/general-admin-register" => Some(Self::GeneralAdminRegister),
            "/multi-vendor-admin-login" => Some(Self::MultiVendorAdminLogin),
            "/multi-vendor-admin-register" => Some(Self::MultiVendorAdminRegister),
            "/forgot-password" => Some(Self::ForgotPassword),
            "/reset-password" => Some(Self::ResetPassword),
            "/dashboard" => Some(Self::Dashboard),
            "/vendors" => Some(Self::Vendors),
            "/customers" => Some(Self::Customers),
            "/orders" => Some(Self::Orders),
            "/settings" => Some(Self::Settings),
            _ => trimmed
                .strip_prefix("/mv/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| Self::MultiVendorDashboard(AdminId::from(id))),
        }
    }

    /// The location path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/".to_owned(),
            Self::GeneralAdminLogin => "/general-admin-login".to_owned(),
            Self::GeneralAdminRegister => "/general-admin-register".to_owned(),
            Self::MultiVendorAdminLogin => "/multi-vendor-admin-login".to_owned(),
            Self::MultiVendorAdminRegister => "/multi-vendor-admin-register".to_owned(),
            Self::ForgotPassword => "/forgot-password".to_owned(),
            Self::ResetPassword => "/reset-password".to_owned(),
            Self::Dashboard => "/dashboard".to_owned(),
            Self::Vendors => "/vendors".to_owned(),
            Self::Customers => "/customers".to_owned(),
            Self::Orders => "/orders".to_owned(),
            Self::Settings => "/settings".to_owned(),
            Self::MultiVendorDashboard(id) => format!("/mv/{id}"),
        }
    }

    /// Whether this route requires an authenticated session.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::Vendors
                | Self::Customers
                | Self::Orders
                | Self::Settings
                | Self::MultiVendorDashboard(_)
        )
    }

    /// Whether this is an entry surface (login/register/landing) that an
    /// already-authenticated admin is bounced away from.
    #[must_use]
    pub const fn is_entry(&self) -> bool {
        matches!(
            self,
            Self::Landing
                | Self::GeneralAdminLogin
                | Self::GeneralAdminRegister
                | Self::MultiVendorAdminLogin
                | Self::MultiVendorAdminRegister
        )
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested route.
    Allow,
    /// State is still [`AuthState::Initializing`]; render nothing and
    /// re-evaluate once it resolves. Never redirect from here.
    Pending,
    /// Navigate to `to` instead, replacing the current history entry.
    Redirect {
        to: Route,
        /// The originally requested route, kept so the caller can return
        /// there after a successful login. Only set when the redirect was
        /// caused by missing authentication.
        then: Option<Route>,
    },
}

impl RouteDecision {
    const fn redirect(to: Route) -> Self {
        Self::Redirect { to, then: None }
    }
}

/// Decide whether `route` may render under `state`.
///
/// Rules, in order:
/// 1. `Initializing` state is always [`RouteDecision::Pending`].
/// 2. Password-recovery surfaces always render.
/// 3. Unauthenticated access to a protected route redirects to the landing
///    page, remembering the requested route for a post-login return.
/// 4. An authenticated admin on an entry surface is sent to their home:
///    `/dashboard` for general admins, `/mv/:selfId` for multi-vendor
///    admins.
/// 5. `/mv/:adminId` is multi-vendor only and self-scoped: a general admin
///    is sent to `/dashboard`, a multi-vendor admin with a foreign id is
///    sent to their own `/mv/:selfId`.
/// 6. Everything else renders.
#[must_use]
pub fn evaluate(state: &AuthState, route: &Route) -> RouteDecision {
    let session = match state {
        AuthState::Initializing => return RouteDecision::Pending,
        AuthState::Unauthenticated => {
            if route.is_protected() {
                return RouteDecision::Redirect {
                    to: Route::Landing,
                    then: Some(route.clone()),
                };
            }
            return RouteDecision::Allow;
        }
        AuthState::Authenticated(session) => session,
    };

    if route.is_entry() {
        return RouteDecision::redirect(home_route(session.role(), session.admin_id()));
    }

    if let Route::MultiVendorDashboard(requested) = route {
        match session.role() {
            AdminRole::GeneralAdmin => {
                return RouteDecision::redirect(Route::Dashboard);
            }
            AdminRole::MultiVendorAdmin => {
                if requested != session.admin_id() {
                    return RouteDecision::redirect(Route::MultiVendorDashboard(
                        session.admin_id().clone(),
                    ));
                }
            }
        }
    }

    RouteDecision::Allow
}

/// The post-login home surface for a role.
#[must_use]
pub fn home_route(role: AdminRole, admin_id: &AdminId) -> Route {
    match role {
        AdminRole::GeneralAdmin => Route::Dashboard,
        AdminRole::MultiVendorAdmin => Route::MultiVendorDashboard(admin_id.clone()),
    }
}
