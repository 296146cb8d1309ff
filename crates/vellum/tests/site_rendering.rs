//! End-to-end rendering of a small site from disk.

use std::fs;
use std::sync::{Arc, RwLock};
use std::thread;

use serde::Serialize;
use serde_json::json;
use minijinja::Value;
use tempfile::TempDir;
use vellum::{helper, TemplateError, TemplateManager, TemplateManagerConfig, ROOT_TEMPLATE};

fn write_site(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }
    dir
}

const LAYOUT: &str = r#"<html><head><title>{{ title }}</title><link href="{{ staticurl('css/site.css') }}"></head><body>{% include "nav" %}{% block content %}{% endblock %}</body></html>"#;

fn blog_site() -> TempDir {
    write_site(&[
        ("base.html", LAYOUT),
        ("nav.html", r#"<nav><a href="{{ baseurl('/') }}">{{ site_name }}</a></nav>"#),
        (
            "post.html",
            r#"{% extends "layout" %}{% block content %}<article>{{ body }}</article>{% endblock %}"#,
        ),
    ])
}

fn blog_manager(dir: &TempDir) -> TemplateManager {
    let mut manager =
        TemplateManager::new(dir.path(), "https://example.com", "https://cdn.example.com");
    manager.set_layout("base").set_data("site_name", "Example Blog");
    manager.add_templates(["nav", "post"]).unwrap();
    manager
}

#[test]
fn layout_title_binds() {
    let dir = blog_site();
    let manager = blog_manager(&dir);

    let mut out = Vec::new();
    manager.execute(&mut out, &json!({"title": "X"})).unwrap();
    let html = String::from_utf8(out).unwrap();

    assert!(html.contains("<title>X</title>"));
    assert!(html.contains(r#"<link href="https:&#x2f;&#x2f;cdn.example.com&#x2f;css&#x2f;site.css">"#));
    assert!(html.contains(r#"<a href="https:&#x2f;&#x2f;example.com&#x2f;">Example Blog</a>"#));
}

#[test]
fn page_extends_layout() {
    let dir = blog_site();
    let manager = blog_manager(&dir);

    #[derive(Serialize)]
    struct Post<'a> {
        title: &'a str,
        body: &'a str,
    }

    let html = manager
        .render("post", &Post { title: "Hello", body: "First post" })
        .unwrap();
    assert!(html.starts_with("<html>"));
    assert!(html.contains("<title>Hello</title>"));
    assert!(html.contains("<article>First post</article>"));
}

#[test]
fn per_call_data_overrides_global() {
    let dir = blog_site();
    let manager = blog_manager(&dir);

    let html = manager
        .render(ROOT_TEMPLATE, &json!({"site_name": "Guest Blog"}))
        .unwrap();
    assert!(html.contains(">Guest Blog</a>"));
    assert_eq!(manager.global_data()["site_name"], "Example Blog");
}

#[test]
fn unknown_template_is_reported_by_name() {
    let dir = blog_site();
    let manager = blog_manager(&dir);

    let err = manager.execute_named(Vec::new(), "archive", &()).unwrap_err();
    assert!(matches!(err, TemplateError::NotFound { ref name } if name == "archive"));
}

#[test]
fn broken_set_still_renders_fallback() {
    let dir = write_site(&[("base.html", "{% for %}")]);
    let mut manager = TemplateManager::new(dir.path(), "", "");
    manager.set_layout("base");

    let err = manager.add_templates(["home"]).unwrap_err();
    assert!(matches!(err, TemplateError::Parse { .. }));

    let mut out = Vec::new();
    err.render_fallback(&mut out).unwrap();
    let html = String::from_utf8(out).unwrap();
    assert!(html.contains("<title>Server Error</title>"));
    assert!(html.contains("could not be loaded"));
}

#[test]
fn error_template_fields() {
    let manager = TemplateManager::new(".", "", "");
    let page = manager.error_template();

    let html = page.render(&()).unwrap();
    assert!(html.contains("<title>Server Error</title>"));
    assert!(html.contains("<h1>Server Error</h1>"));

    let html = page.render(&json!({"title": "Oops", "message": "bad"})).unwrap();
    assert!(html.contains("<title>Oops</title>"));
    assert!(html.contains("<h1>bad</h1>"));
}

#[test]
fn delimiters_decide_what_binds() {
    let dir = write_site(&[("page.html", "value: <% x %>")]);

    let mut custom = TemplateManager::new(dir.path(), "", "");
    custom.set_delimiters("<%", "%>").unwrap();
    custom.add_templates(["page"]).unwrap();
    assert_eq!(custom.render("page", &json!({"x": 7})).unwrap(), "value: 7");

    let mut default = TemplateManager::new(dir.path(), "", "");
    default.add_templates(["page"]).unwrap();
    assert_eq!(
        default.render("page", &json!({"x": 7})).unwrap(),
        "value: <% x %>"
    );
}

#[test]
fn config_file_drives_manager() {
    let dir = write_site(&[
        (
            "site.yaml",
            "template_dir: pages\nextension: tmpl\nlayout: main\nstatic_url: /static\ndata:\n  owner: ana\n",
        ),
        ("pages/main.tmpl", "{{ owner }} {{ staticurl('app.js') }}"),
    ]);
    let config = TemplateManagerConfig::from_file(dir.path().join("site.yaml")).unwrap();
    let mut manager = TemplateManager::from_config(config);
    manager.add_templates(std::iter::empty::<&str>()).unwrap();

    assert_eq!(manager.render(ROOT_TEMPLATE, &()).unwrap(), "ana /static/app.js");
}

#[test]
fn helpers_can_fail_a_render() {
    let dir = write_site(&[("page.html", "{{ strict(n) }}")]);
    let mut manager = TemplateManager::new(dir.path(), "", "");
    manager.add_func(
        "strict",
        helper(|args: &[Value]| match args.first().and_then(|v| i64::try_from(v.clone()).ok()) {
            Some(n) if n >= 0 => Ok(Value::from(n)),
            _ => Err(minijinja::Error::new(
                minijinja::ErrorKind::InvalidOperation,
                "negative",
            )),
        }),
    );
    manager.add_templates(["page"]).unwrap();

    assert_eq!(manager.render("page", &json!({"n": 3})).unwrap(), "3");
    let err = manager.render("page", &json!({"n": -1})).unwrap_err();
    assert!(matches!(err, TemplateError::Execute { .. }));
}

#[test]
fn concurrent_renders_share_a_loaded_manager() {
    let dir = blog_site();
    let manager = Arc::new(blog_manager(&dir));

    thread::scope(|scope| {
        for i in 0..8 {
            let manager = Arc::clone(&manager);
            scope.spawn(move || {
                let title = format!("post {}", i);
                let html = manager
                    .render("post", &json!({"title": title, "body": "b"}))
                    .unwrap();
                assert!(html.contains(&format!("<title>{}</title>", title)));
            });
        }
    });
}

#[test]
fn set_data_after_load_behind_lock() {
    let dir = blog_site();
    let manager = Arc::new(RwLock::new(blog_manager(&dir)));

    manager.write().unwrap().set_data("site_name", "Renamed");
    let html = manager
        .read()
        .unwrap()
        .render(ROOT_TEMPLATE, &json!({"title": "t"}))
        .unwrap();
    assert!(html.contains(">Renamed</a>"));
}
