//! Endpoint paths and header names, relative to the configured API origin.

pub const LOGIN: &str = "/user/login?_format=json";
pub const LOGOUT: &str = "/user/logout";
pub const SESSION_TOKEN: &str = "/session/token";
pub const LOGIN_STATUS: &str = "/user/login_status?_format=json";
pub const MAIN_MENU: &str = "/api/menu_items/main?_format=json";
pub const CREATE_EVENT: &str = "/api/booking/event/create";
pub const BOOKING_FORM_DATA: &str =
    "/api/booking/event/data/get?bands=1&callers=1&soundTechs=1&hosts=1&_format=json";

/// Header carrying the anti-forgery token on authenticated requests.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Joins an origin and a path, tolerating a trailing slash on the origin.
pub fn join(origin: &str, path: &str) -> String {
    let origin = origin.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{origin}{path}")
    } else {
        format!("{origin}/{path}")
    }
}
