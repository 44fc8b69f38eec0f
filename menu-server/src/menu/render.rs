//! Menu page rendering (Tera)
//!
//! Templates are compiled into the binary so the server does not depend on
//! the working directory.

use serde::Serialize;
use tera::{Context, Tera};

use super::view::MenuView;
use crate::utils::AppError;

const MENU_TEMPLATE: &str = "menu.html";

#[derive(Serialize)]
struct ItemCard<'a> {
    id: i64,
    name: &'a str,
    price: String,
    description: &'a str,
    image_url: Option<String>,
}

#[derive(Serialize)]
struct SectionCard<'a> {
    id: i64,
    name: &'a str,
    items: Vec<ItemCard<'a>>,
}

/// 菜单页面渲染器
#[derive(Clone, Debug)]
pub struct MenuRenderer {
    tera: Tera,
    media_url: String,
}

impl MenuRenderer {
    pub fn new(media_url: impl Into<String>) -> Result<Self, AppError> {
        let mut tera = Tera::default();
        tera.add_raw_template(MENU_TEMPLATE, include_str!("../../templates/menu.html"))
            .map_err(|e| AppError::internal(format!("Failed to load menu template: {e}")))?;
        Ok(Self {
            tera,
            media_url: media_url.into(),
        })
    }

    pub fn render(&self, view: &MenuView) -> Result<String, AppError> {
        let sections: Vec<SectionCard<'_>> = view
            .sections()
            .into_iter()
            .map(|section| SectionCard {
                id: section.category.id,
                name: &section.category.name,
                items: section
                    .items
                    .iter()
                    .map(|item| ItemCard {
                        id: item.id,
                        name: &item.name,
                        price: format!("{:.2}", item.price),
                        description: &item.description,
                        image_url: item.image_url(&self.media_url),
                    })
                    .collect(),
            })
            .collect();

        let mut ctx = Context::new();
        ctx.insert("settings", &view.settings);
        ctx.insert("whatsapp_link", &view.settings.whatsapp_link());
        ctx.insert("sections", &sections);

        self.tera.render(MENU_TEMPLATE, &ctx).map_err(|e| {
            tracing::error!(error = ?e, "Menu template render failed");
            AppError::new(shared::error::ErrorCode::RenderError)
        })
    }
}
