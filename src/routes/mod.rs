/// Router Module Index
///
/// Organizes the application's routing logic by access level, so the
/// session gate is applied explicitly at the module boundary rather than
/// per-handler.

/// Routes accessible to any client, anonymous or logged-in. This includes
/// the session endpoints themselves and the open CRUD surface.
pub mod public;

/// Ownership-scoped routes protected by the `AuthUser` extractor middleware.
/// Requires a valid session cookie.
pub mod authenticated;
