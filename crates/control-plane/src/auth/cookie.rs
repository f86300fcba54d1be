// Session cookie helpers
// Decision: HttpOnly + SameSite=Lax + Path=/, Max-Age equal to the token lifetime

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::config::CookieConfig;

/// Build the session cookie carrying `token`
pub fn build_auth_cookie(config: &CookieConfig, token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((config.name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

pub fn set_auth_cookie(
    jar: CookieJar,
    config: &CookieConfig,
    token: String,
    max_age_secs: i64,
) -> CookieJar {
    jar.add(build_auth_cookie(config, token, max_age_secs))
}

/// Expire the session cookie.
/// The removal is added explicitly so it is sent even when the request
/// carried no cookie (CookieJar::remove only emits it for original cookies).
pub fn remove_auth_cookie(jar: CookieJar, config: &CookieConfig) -> CookieJar {
    let mut cookie = build_auth_cookie(config, String::new(), 0);
    cookie.make_removal();
    jar.add(cookie)
}

pub fn get_auth_cookie(jar: &CookieJar, config: &CookieConfig) -> Option<String> {
    jar.get(&config.name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};
    use axum::response::IntoResponse;

    fn config(secure: bool) -> CookieConfig {
        CookieConfig {
            name: "auth_token".to_string(),
            secure,
        }
    }

    fn set_cookie_header(jar: CookieJar) -> String {
        let response = jar.into_response();
        response
            .headers()
            .get(header::SET_COOKIE)
            .expect("Set-Cookie header")
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let header = set_cookie_header(set_auth_cookie(
            CookieJar::new(),
            &config(false),
            "abc.def.ghi".to_string(),
            86400,
        ));

        assert!(header.starts_with("auth_token=abc.def.ghi"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Max-Age=86400"));
        assert!(!header.contains("Secure"));
    }

    #[test]
    fn test_secure_attribute() {
        let header = set_cookie_header(set_auth_cookie(
            CookieJar::new(),
            &config(true),
            "token".to_string(),
            60,
        ));
        assert!(header.contains("Secure"));
    }

    #[test]
    fn test_remove_cookie_without_original() {
        let header = set_cookie_header(remove_auth_cookie(CookieJar::new(), &config(false)));

        assert!(header.starts_with("auth_token="));
        assert!(header.contains("Max-Age=0"));
        assert!(header.contains("Path=/"));
    }

    #[test]
    fn test_get_auth_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth_token=xyz"),
        );
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(get_auth_cookie(&jar, &config(false)), Some("xyz".to_string()));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_token="));
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(get_auth_cookie(&jar, &config(false)), None);

        assert_eq!(get_auth_cookie(&CookieJar::new(), &config(false)), None);
    }
}
