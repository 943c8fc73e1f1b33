//! HTML rendering for the locator screens
//!
//! Plain string building; every dynamic value goes through [`escape`].

use std::fmt::Write;

use crate::application::forms::{login_form, node_form, LoginForm, NodeForm};
use crate::domain::choices::Level;
use crate::shared::FieldErrors;

use super::{Chrome, NodeItem, RoomItem, SubstationItem};

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn layout(title: &str, chrome: &Chrome, body: &str) -> String {
    let mut menu = String::new();
    for room in &chrome.menu {
        let _ = write!(
            menu,
            "<li><a href=\"{}\">{}</a></li>",
            escape(&room.url),
            escape(&room.name)
        );
    }

    let account = match &chrome.username {
        Some(name) => format!(
            "<span class=\"user\">{}</span> | <a href=\"/logout/\">Вийти</a>",
            escape(name)
        ),
        None => "<a href=\"/login/\">Увійти</a>".to_string(),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"uk\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n\
         <header>\n<nav>\n<a href=\"/\">Головна</a> | <a href=\"/search/\">Пошук</a> | \
         <a href=\"/add_node/\">Додати</a> | {account}\n</nav>\n\
         <ul class=\"rooms\">{menu}</ul>\n</header>\n\
         <main>\n<h1>{title}</h1>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape(title),
        account = account,
        menu = menu,
        body = body,
    )
}

pub fn error_page(heading: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{0}</title></head>\n\
         <body>\n<h1>{0}</h1>\n</body>\n</html>\n",
        escape(heading)
    )
}

pub fn substations(items: &[SubstationItem]) -> String {
    let mut out = String::from("<ul class=\"substations\">");
    for s in items {
        let _ = write!(
            out,
            "<li><a href=\"{}\">{}</a> <small>{}</small></li>",
            escape(&s.url),
            escape(&s.name),
            escape(&s.level)
        );
    }
    out.push_str("</ul>");
    out
}

pub fn rooms(items: &[RoomItem]) -> String {
    if items.is_empty() {
        return "<p>Немає МСС</p>".to_string();
    }
    let mut out = String::from("<ul class=\"rooms\">");
    for m in items {
        let _ = write!(
            out,
            "<li><a href=\"{}\">{}</a></li>",
            escape(&m.url),
            escape(&m.name)
        );
    }
    out.push_str("</ul>");
    out
}

fn node_table(items: &[NodeItem]) -> String {
    let mut out = String::from(
        "<table class=\"nodes\">\n<tr><th>НАЗВА</th><th>НОМЕР</th><th>РІВЕНЬ</th>\
         <th>ОБЕРТІВ / ХВ</th><th>ПОТУЖНІСТЬ</th></tr>\n",
    );
    for n in items {
        let _ = writeln!(
            out,
            "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&n.url),
            escape(&n.title),
            escape(&n.slug),
            escape(&n.level_label),
            n.round_per_minute,
            escape(&n.power)
        );
    }
    out.push_str("</table>");
    out
}

pub fn nodes(items: &[NodeItem]) -> String {
    if items.is_empty() {
        return "<p>Немає обладнання</p>".to_string();
    }
    node_table(items)
}

pub fn node(n: &NodeItem) -> String {
    let photo = match &n.label_url {
        Some(url) => format!(
            "<img src=\"{}\" alt=\"{}\">",
            escape(url),
            escape(&n.title)
        ),
        None => "<p>No image</p>".to_string(),
    };
    format!(
        "<div class=\"node\">\n{photo}\n<dl>\n\
         <dt>НАЗВА</dt><dd>{title}</dd>\n\
         <dt>НОМЕР</dt><dd>{slug}</dd>\n\
         <dt>РІВЕНЬ</dt><dd>{level}</dd>\n\
         <dt>ОБЕРТІВ / ХВ</dt><dd>{rpm}</dd>\n\
         <dt>ПОТУЖНІСТЬ</dt><dd>{power}</dd>\n</dl>\n\
         <a href=\"/edit/{slug_attr}/\">Редагувати</a> | \
         <a href=\"/node/{slug_attr}/delete/\">Видалити</a>\n</div>",
        photo = photo,
        title = escape(&n.title),
        slug = escape(&n.slug),
        level = escape(&n.level_label),
        rpm = n.round_per_minute,
        power = escape(&n.power),
        slug_attr = escape(&n.slug),
    )
}

fn error_list(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul class=\"errorlist\">");
    for m in messages {
        let _ = write!(out, "<li>{}</li>", escape(m));
    }
    out.push_str("</ul>");
    out
}

fn select(name: &str, selected: &str, options: &[(String, String)]) -> String {
    let mut out = format!("<select name=\"{0}\" id=\"id_{0}\">", name);
    for (value, label) in options {
        let mark = if value == selected { " selected" } else { "" };
        let _ = write!(
            out,
            "<option value=\"{}\"{}>{}</option>",
            escape(value),
            mark,
            escape(label)
        );
    }
    out.push_str("</select>");
    out
}

pub fn node_form(action: &str, form: &NodeForm, errors: &FieldErrors, mccs: &[RoomItem]) -> String {
    let mut out = format!(
        "<form method=\"post\" action=\"{}\" enctype=\"multipart/form-data\">\n{}",
        escape(action),
        error_list(errors.non_field())
    );

    let levels: Vec<(String, String)> = Level::ALL
        .iter()
        .map(|l| (l.as_str().to_string(), l.label().to_string()))
        .collect();
    let mut mcc_options = vec![(String::new(), "---------".to_string())];
    mcc_options.extend(mccs.iter().map(|m| (m.id.to_string(), m.name.clone())));

    for (field, label) in node_form::FIELDS {
        let input = match field {
            "title" => text_input(field, &form.title),
            "slug" => text_input(field, &form.slug),
            "label" => {
                let file = format!(
                    "<input type=\"file\" name=\"{0}\" id=\"id_{0}\" accept=\"image/*\">",
                    field
                );
                if form.label.is_empty() {
                    file
                } else {
                    format!(
                        "Currently: {} <input type=\"checkbox\" name=\"label-clear\" \
                         id=\"label-clear_id\"><label for=\"label-clear_id\">Clear</label><br>\
                         Change: {}",
                        escape(&form.label),
                        file
                    )
                }
            }
            "level" => select(field, &form.level, &levels),
            "round_per_minute" => number_input(field, &form.round_per_minute, "1"),
            "power" => number_input(field, &form.power, "0.1"),
            "mcc" => select(field, &form.mcc, &mcc_options),
            _ => continue,
        };
        let _ = writeln!(
            out,
            "<p><label for=\"id_{field}\">{label}</label> {input}{errors}</p>",
            field = field,
            label = escape(label.trim()),
            input = input,
            errors = error_list(errors.get(field)),
        );
    }

    out.push_str("<button type=\"submit\">Зберегти</button>\n</form>");
    out
}

fn text_input(name: &str, value: &str) -> String {
    format!(
        "<input type=\"text\" name=\"{0}\" id=\"id_{0}\" value=\"{1}\">",
        name,
        escape(value)
    )
}

fn number_input(name: &str, value: &str, step: &str) -> String {
    format!(
        "<input type=\"number\" name=\"{0}\" id=\"id_{0}\" step=\"{1}\" value=\"{2}\">",
        name,
        step,
        escape(value)
    )
}

pub fn search(slug: &str, items: &[NodeItem]) -> String {
    let results = if items.is_empty() {
        "<p>Нічого не знайдено</p>".to_string()
    } else {
        node_table(items)
    };
    format!(
        "<form method=\"get\" action=\"/search/\">\n\
         <label for=\"id_slug\">НОМЕР</label> {input}\n\
         <button type=\"submit\">Пошук</button>\n</form>\n{results}",
        input = text_input("slug", slug),
        results = results,
    )
}

pub fn delete_node(n: &NodeItem) -> String {
    format!(
        "<form method=\"post\" action=\"/node/{slug}/delete/\">\n\
         <p>Видалити {title} ({slug})?</p>\n\
         <button type=\"submit\">Так</button> <a href=\"{url}\">Ні</a>\n</form>",
        slug = escape(&n.slug),
        title = escape(&n.title),
        url = escape(&n.url),
    )
}

pub fn node_deleted() -> String {
    "<p>Обладнання видалено.</p>\n<a href=\"/\">На головну</a>".to_string()
}

pub fn login(form: &LoginForm, errors: &FieldErrors) -> String {
    let mut out = String::from("<form method=\"post\" action=\"/login/\">\n");
    out.push_str(&error_list(errors.non_field()));
    if let Some(next) = &form.next {
        let _ = writeln!(
            out,
            "<input type=\"hidden\" name=\"next\" value=\"{}\">",
            escape(next)
        );
    }
    for (field, label) in login_form::FIELDS {
        let input = if field == "password" {
            format!("<input type=\"password\" name=\"{0}\" id=\"id_{0}\">", field)
        } else {
            text_input(field, &form.username)
        };
        let _ = writeln!(
            out,
            "<p><label for=\"id_{field}\">{label}</label> {input}{errors}</p>",
            field = field,
            label = escape(label),
            input = input,
            errors = error_list(errors.get(field)),
        );
    }
    out.push_str("<button type=\"submit\">Увійти</button>\n</form>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape("<img src='x'> & \"y\""),
            "&lt;img src=&#x27;x&#x27;&gt; &amp; &quot;y&quot;"
        );
    }

    #[test]
    fn layout_lists_menu_and_user() {
        let chrome = Chrome {
            menu: vec![SubstationItem {
                id: 1,
                name: "РП-4".into(),
                slug: "rp-4".into(),
                level: "4.8".into(),
                url: "/substation/1/".into(),
            }],
            username: Some("testuser".into()),
        };
        let html = layout("Гoлoвна", &chrome, "<p>body</p>");
        assert!(html.contains("<a href=\"/substation/1/\">РП-4</a>"));
        assert!(html.contains("testuser"));
        assert!(html.contains("/logout/"));
        assert!(html.contains("<p>body</p>"));

        let anonymous = layout("x", &Chrome::default(), "");
        assert!(anonymous.contains("/login/"));
    }

    #[test]
    fn form_shows_field_errors_and_selection() {
        let form = NodeForm {
            level: "8.0".into(),
            mcc: "2".into(),
            ..Default::default()
        };
        let errors = FieldErrors::single("title", "This field is required.");
        let mccs = vec![
            RoomItem {
                id: 1,
                name: "MCC-1".into(),
                slug: "mcc-1".into(),
                substation_id: 1,
                url: "/mcc/mcc-1/".into(),
            },
            RoomItem {
                id: 2,
                name: "MCC-2".into(),
                slug: "mcc-2".into(),
                substation_id: 1,
                url: "/mcc/mcc-2/".into(),
            },
        ];
        let html = node_form("/add_node/", &form, &errors, &mccs);
        assert!(html.contains("<li>This field is required.</li>"));
        assert!(html.contains("<option value=\"8.0\" selected>8.0m</option>"));
        assert!(html.contains("<option value=\"2\" selected>MCC-2</option>"));
        assert!(html.contains("ОБЕРТІВ / ХВ"));
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("<input type=\"file\" name=\"label\""));
        assert!(!html.contains("label-clear"));

        let editing = NodeForm {
            label: "photos/pump.png".into(),
            ..form
        };
        let html = node_form("/edit/1_1/", &editing, &FieldErrors::new(), &mccs);
        assert!(html.contains("Currently: photos/pump.png"));
        assert!(html.contains("name=\"label-clear\""));
    }
}
