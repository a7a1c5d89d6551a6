use crate::config::LocaleConfig;
use crate::tests::common::{
    create_test_app, create_test_app_with_locale, empty_request, json_request, request_with_cookie,
    send,
};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_no_cookie_uses_default_locale() {
    let (app, _) = create_test_app().await;

    let res = send(&app, empty_request("GET", "/api/locale")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["locale"], "en");
    assert!(res.body["time_zone"].is_null());
    assert!(res.set_cookies().is_empty(), "Resolving alone must not write a cookie");
}

#[tokio::test]
async fn test_cookie_resolves_locale_and_time_zone() {
    let (app, _) = create_test_app().await;

    let req = request_with_cookie(
        "GET",
        "/api/locale",
        "NG_TRANSLATE_LANG_KEY=%22pt_BR America/Sao_Paulo%22",
    );
    let res = send(&app, req).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["locale"], "pt_BR");
    assert_eq!(res.body["time_zone"], "America/Sao_Paulo");
    assert!(res.body["local_time"].is_string());
    assert!(res.set_cookies().is_empty());
}

#[tokio::test]
async fn test_query_param_overrides_cookie() {
    let (app, _) = create_test_app().await;

    let req = request_with_cookie(
        "GET",
        "/api/locale?language=fr",
        "NG_TRANSLATE_LANG_KEY=%22pt_BR America/Sao_Paulo%22",
    );
    let res = send(&app, req).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["locale"], "fr");
    assert!(res.body["time_zone"].is_null(), "Override leaves the time zone unset");
    assert_eq!(res.set_cookies(), vec!["NG_TRANSLATE_LANG_KEY=%22fr%22; Path=/".to_string()]);
}

#[tokio::test]
async fn test_query_param_applies_to_any_route() {
    let (app, _) = create_test_app().await;

    let res = send(&app, empty_request("GET", "/api/alunos?language=pt-BR")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.set_cookies(), vec!["NG_TRANSLATE_LANG_KEY=%22pt_BR%22; Path=/".to_string()]);
}

#[tokio::test]
async fn test_percent_encoded_param_name_overrides() {
    let (app, _) = create_test_app().await;

    let res = send(&app, empty_request("GET", "/api/locale?%6Canguage=fr")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["locale"], "fr");
    assert_eq!(res.set_cookies(), vec!["NG_TRANSLATE_LANG_KEY=%22fr%22; Path=/".to_string()]);
}

#[tokio::test]
async fn test_unparseable_query_param_degrades_to_default() {
    let (app, _) = create_test_app().await;

    let res = send(&app, empty_request("GET", "/api/locale?language=%3F%3F%3F")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["locale"], "en");
    assert_eq!(res.set_cookies(), vec!["NG_TRANSLATE_LANG_KEY=%22-%22; Path=/".to_string()]);
}

#[tokio::test]
async fn test_malformed_cookie_never_fails_request() {
    let (app, _) = create_test_app().await;

    for cookie in ["NG_TRANSLATE_LANG_KEY=???", "NG_TRANSLATE_LANG_KEY=", "NG_TRANSLATE_LANG_KEY=%22"] {
        let res = send(&app, request_with_cookie("GET", "/api/locale", cookie)).await;
        assert_eq!(res.status, StatusCode::OK, "cookie {:?}", cookie);
        assert_eq!(res.body["locale"], "en", "cookie {:?}", cookie);
    }
}

#[tokio::test]
async fn test_unknown_time_zone_falls_back() {
    let (app, _) = create_test_app().await;

    let req = request_with_cookie("GET", "/api/locale", "NG_TRANSLATE_LANG_KEY=%22en Moon/Base%22");
    let res = send(&app, req).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["time_zone"], "GMT");
}

#[tokio::test]
async fn test_set_locale_writes_cookie() {
    let (app, _) = create_test_app().await;

    let body = json!({ "locale": "pt-BR", "time_zone": "America/Sao_Paulo" });
    let res = send(&app, json_request("PUT", "/api/locale", body)).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["locale"], "pt_BR");
    assert_eq!(res.body["time_zone"], "America/Sao_Paulo");
    assert_eq!(
        res.set_cookies(),
        vec!["NG_TRANSLATE_LANG_KEY=%22pt_BR America/Sao_Paulo%22; Path=/".to_string()]
    );
}

#[tokio::test]
async fn test_set_locale_cookie_is_read_back() {
    let (app, _) = create_test_app().await;

    let body = json!({ "locale": "es", "time_zone": "Europe/Madrid" });
    let res = send(&app, json_request("PUT", "/api/locale", body)).await;
    let set_cookie = res.set_cookies().remove(0);
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let res = send(&app, request_with_cookie("GET", "/api/locale", &cookie)).await;
    assert_eq!(res.body["locale"], "es");
    assert_eq!(res.body["time_zone"], "Europe/Madrid");
}

#[tokio::test]
async fn test_clear_locale_expires_cookie() {
    let (app, _) = create_test_app().await;

    let req = request_with_cookie("DELETE", "/api/locale", "NG_TRANSLATE_LANG_KEY=%22fr%22");
    let res = send(&app, req).await;

    assert_eq!(res.status, StatusCode::NO_CONTENT);
    let cookies = res.set_cookies();
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("NG_TRANSLATE_LANG_KEY=;"));
    assert!(cookies[0].contains("Max-Age=0"));
    assert!(cookies[0].contains("Path=/"));
}

#[tokio::test]
async fn test_error_messages_follow_cookie_locale() {
    let (app, _) = create_test_app().await;

    let en = send(&app, empty_request("GET", "/api/alunos/999")).await;
    let pt = send(
        &app,
        request_with_cookie("GET", "/api/alunos/999", "NG_TRANSLATE_LANG_KEY=%22pt_BR%22"),
    )
    .await;

    assert_eq!(en.status, StatusCode::NOT_FOUND);
    assert_eq!(pt.status, StatusCode::NOT_FOUND);
    assert_eq!(en.body["code"], 3000);
    assert!(en.body["message"].as_str().unwrap().contains("Aluno 999"));
    assert!(pt.body["message"].as_str().unwrap().contains("Aluno 999"));
    assert_ne!(en.body["message"], pt.body["message"]);
}

#[tokio::test]
async fn test_configured_cookie_and_default() {
    let locale = LocaleConfig {
        cookie_name: "LANG".to_string(),
        query_param: "lang".to_string(),
        default_locale: "pt_BR".to_string(),
    };
    let (app, _) = create_test_app_with_locale(locale).await;

    let res = send(&app, empty_request("GET", "/api/locale")).await;
    assert_eq!(res.body["locale"], "pt_BR");

    let res = send(&app, empty_request("GET", "/api/locale?lang=en")).await;
    assert_eq!(res.body["locale"], "en");
    assert_eq!(res.set_cookies(), vec!["LANG=%22en%22; Path=/".to_string()]);

    // the default parameter name is no longer an override
    let res = send(&app, empty_request("GET", "/api/locale?language=fr")).await;
    assert_eq!(res.body["locale"], "pt_BR");
    assert!(res.set_cookies().is_empty());
}
