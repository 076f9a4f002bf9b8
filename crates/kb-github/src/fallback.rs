//! Static content served when GitHub cannot be reached.
//!
//! Placeholder documents keep the site navigable: every category and article
//! still resolves to markdown with a title and standard sections.

use kb_naming::{display_title, parse_name};

use crate::types::{FileEntry, file_name};

/// Category directories listed when the content root cannot be fetched.
pub const FALLBACK_CATEGORIES: [&str; 3] = ["1_html_css", "2_javascript", "3_react"];

/// Repository README shown when it cannot be fetched.
pub const README_FALLBACK: &str = "\
# Frontend Knowledge Base

Welcome to the Frontend Knowledge Base - a comprehensive collection of frontend development resources and best practices.

## About

This knowledge base covers essential topics in frontend development, including:

- **HTML & CSS**: Fundamentals, advanced techniques, and modern approaches
- **JavaScript**: Core concepts, ES6+, and advanced patterns
- **React**: Components, hooks, state management, and optimization
- **Backend**: Database integration, caching, and server-side concepts
- **Quality Management**: Testing strategies and automation
- **State Management**: Redux, Context API, and modern alternatives

## Note

*Content is temporarily unavailable due to API limitations. Please try again later for full content.*
";

/// Directory listing used in place of the content root.
#[must_use]
pub fn fallback_structure(root: &str) -> Vec<FileEntry> {
    FALLBACK_CATEGORIES
        .iter()
        .map(|name| FileEntry::dir(&join_path(root, name)))
        .collect()
}

/// Placeholder markdown for the file at `path`.
///
/// Category main pages (`0_` prefix) get an overview template, other files
/// an article template.
#[must_use]
pub fn placeholder_markdown(path: &str) -> String {
    let name = file_name(path);
    let title = display_title(name);

    if parse_name(name).is_main_page {
        main_page_template(&title)
    } else {
        article_template(&title)
    }
}

fn main_page_template(title: &str) -> String {
    format!(
        "\
# {title}

## Обзор

Добро пожаловать в раздел **{title}**! Этот раздел содержит материалы и ресурсы по данной теме.

## Содержание раздела

В этом разделе вы найдете:

- Основные концепции и принципы
- Практические примеры и руководства
- Лучшие практики и рекомендации
- Полезные ресурсы и ссылки

## Начало работы

Для изучения материалов этого раздела рекомендуется:

1. Ознакомиться с основными концепциями
2. Изучить практические примеры
3. Применить полученные знания на практике

---

*Содержимое этого файла будет дополнено в ближайшее время.*
"
    )
}

fn article_template(title: &str) -> String {
    format!(
        "\
# {title}

## Введение

Эта статья посвящена теме: **{title}**.

## Основные понятия

*Содержимое будет добавлено в ближайшее время.*

## Практические примеры

*Примеры и код будут добавлены позже.*

## Заключение

*Выводы и рекомендации будут представлены после написания основного содержимого.*

---

*Статья находится в разработке и будет дополнена.*
"
    )
}

pub(crate) fn join_path(parent: &str, name: &str) -> String {
    let parent = parent.trim_end_matches('/');
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}/{name}")
    }
}
