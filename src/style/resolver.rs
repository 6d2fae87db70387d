use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::global::{overlay, OFFSET_LAYER_CLASSES};
use super::icons::{Icon, IconRegistry};
use crate::fonts::FontCatalog;
use crate::theme::{
    button_defaults, is_gradient_expression, ButtonProperty, ButtonRadius, ButtonSize,
    ButtonVariant, FontSource, GlobalButtonStyle, IconPosition, TokenKey, TokenStore,
    DEFAULT_PRIMARY_FONT, DEFAULT_SECONDARY_FONT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    Solid,
    Gradient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColors {
    /// `None` for text links, which have no box.
    pub background: Option<String>,
    pub hover: String,
    pub text: String,
    pub border: Option<String>,
    pub shadow: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedIcon {
    pub icon: Icon,
    pub position: IconPosition,
    pub margin_class: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFont {
    pub source: FontSource,
    pub name: String,
    /// Full `font-family` declaration including the generic fallback.
    pub family: String,
    pub weight: String,
}

/// Everything a caller needs to render one button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderDescriptor {
    pub variant: ButtonVariant,
    pub global_style: GlobalButtonStyle,
    pub classes: Vec<String>,
    pub inline_style: BTreeMap<String, String>,
    pub background_mode: BackgroundMode,
    pub is_two_layer: bool,
    /// Classes for the offset layer drawn behind the button. Empty unless
    /// `is_two_layer`.
    pub background_layer_classes: Vec<String>,
    pub colors: ResolvedColors,
    pub radius: Option<ButtonRadius>,
    pub size: Option<ButtonSize>,
    pub icon: Option<ResolvedIcon>,
    pub font: ResolvedFont,
}

impl RenderDescriptor {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|candidate| candidate == class)
    }

    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }

    /// Inline overrides as a `style` attribute value.
    pub fn style_attr(&self) -> String {
        self.inline_style
            .iter()
            .map(|(property, value)| format!("{property}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Turns button variants and a token snapshot into render descriptors.
/// Missing data always resolves through defaults; nothing here fails.
#[derive(Debug, Clone)]
pub struct StyleResolver {
    catalog: Arc<FontCatalog>,
    icons: IconRegistry,
}

impl StyleResolver {
    pub fn new(catalog: Arc<FontCatalog>) -> Self {
        Self {
            catalog,
            icons: IconRegistry::builtin(),
        }
    }

    pub fn with_icons(mut self, icons: IconRegistry) -> Self {
        self.icons = icons;
        self
    }

    pub fn catalog(&self) -> &FontCatalog {
        &self.catalog
    }

    pub fn icons(&self) -> &IconRegistry {
        &self.icons
    }

    /// Resolves with the store's own global button style.
    pub fn resolve(&self, variant: ButtonVariant, store: &TokenStore) -> RenderDescriptor {
        let style = store.global_button_style().unwrap_or_default();
        self.resolve_with_style(variant, store, style)
    }

    pub fn resolve_all(&self, store: &TokenStore) -> Vec<RenderDescriptor> {
        ButtonVariant::ALL
            .iter()
            .map(|variant| self.resolve(*variant, store))
            .collect()
    }

    pub fn resolve_with_style(
        &self,
        variant: ButtonVariant,
        store: &TokenStore,
        style: GlobalButtonStyle,
    ) -> RenderDescriptor {
        let defaults = button_defaults(variant);
        let view = store.buttons().variant(variant);
        let common = view.common();
        let boxed = view.boxed();
        let treatment = overlay(style);
        let is_two_layer = treatment.two_layer && !variant.is_text_link();
        let var = |property: ButtonProperty| TokenKey::Button(variant, property).css_variable();

        let colors = ResolvedColors {
            background: boxed.and_then(|tokens| {
                owned(tokens.background_color.as_deref().or(defaults.background))
            }),
            hover: common
                .hover_color
                .as_deref()
                .unwrap_or(defaults.hover)
                .to_string(),
            text: common
                .text_color
                .as_deref()
                .unwrap_or(defaults.text)
                .to_string(),
            border: boxed
                .and_then(|tokens| owned(tokens.border_color.as_deref().or(defaults.border))),
            shadow: boxed
                .and_then(|tokens| owned(tokens.shadow_color.as_deref().or(defaults.shadow))),
        };
        let radius = boxed.and_then(|tokens| tokens.radius.or(defaults.radius));
        let size = boxed.and_then(|tokens| tokens.size.or(defaults.size));

        let mut classes = ClassList::default();
        let mut inline_style = BTreeMap::new();

        if variant.is_text_link() {
            classes.extend([
                "inline-flex",
                "items-center",
                "underline-offset-4",
                "hover:underline",
            ]);
        } else {
            classes.extend(["inline-flex", "items-center", "justify-center", "transition-colors"]);
        }

        let background_mode = match colors.background.as_deref() {
            Some(background) if is_gradient_expression(background) => {
                inline_style.insert("background".to_string(), background.to_string());
                classes.extend(["hover:opacity-90", "transition-opacity"]);
                BackgroundMode::Gradient
            }
            Some(_) => {
                classes.push(format!("bg-[var({})]", var(ButtonProperty::Background)));
                classes.push(format!("hover:bg-[var({})]", var(ButtonProperty::Hover)));
                BackgroundMode::Solid
            }
            None => {
                classes.push(format!("hover:text-[var({})]", var(ButtonProperty::Hover)));
                BackgroundMode::Solid
            }
        };

        // Text, border and shadow are always solid, whatever the stored string says.
        classes.push(format!("text-[var({})]", var(ButtonProperty::Text)));
        if colors.border.is_some() {
            classes.push("border".to_string());
            classes.push(format!("border-[var({})]", var(ButtonProperty::Border)));
        }
        if let Some(shadow) = &colors.shadow {
            inline_style.insert("--tw-shadow-color".to_string(), shadow.clone());
        }

        if let Some(size) = size {
            classes.extend(treatment.padding.unwrap_or(size.classes()).iter().copied());
        }

        if let Some(radius) = radius {
            classes.push(radius.class().to_string());
            if is_two_layer {
                classes.push(radius.before_class().to_string());
            }
        }

        classes.extend(treatment.classes.iter().copied());

        let background_layer_classes = if is_two_layer {
            let mut layer = ClassList::default();
            layer.extend(OFFSET_LAYER_CLASSES.iter().copied());
            layer.push(format!("bg-[var({})]", var(ButtonProperty::Shadow)));
            if let Some(radius) = radius {
                layer.push(radius.class().to_string());
            }
            layer.into_vec()
        } else {
            Vec::new()
        };

        let icon = boxed.and_then(|tokens| {
            let enabled = tokens.icon_enabled.or(defaults.icon_enabled).unwrap_or(false);
            if !enabled {
                return None;
            }
            let position = tokens
                .icon_position
                .or(defaults.icon_position)
                .unwrap_or(IconPosition::Right);
            let name = tokens.icon_name.as_deref().or(defaults.icon_name);
            Some(ResolvedIcon {
                icon: self.icons.lookup_or_default(name),
                position,
                margin_class: position.margin_class(),
            })
        });

        let font = self.resolve_font(
            store,
            common.font_source.unwrap_or(defaults.font_source),
            common.font_weight.as_deref().unwrap_or(defaults.font_weight),
        );
        inline_style.insert("font-family".to_string(), font.family.clone());
        inline_style.insert("font-weight".to_string(), font.weight.clone());

        RenderDescriptor {
            variant,
            global_style: style,
            classes: classes.into_vec(),
            inline_style,
            background_mode,
            is_two_layer,
            background_layer_classes,
            colors,
            radius,
            size,
            icon,
            font,
        }
    }

    /// Font-source indirection shared by buttons and text roles:
    /// source → site font name → catalog family declaration.
    pub fn resolve_font(
        &self,
        store: &TokenStore,
        source: FontSource,
        weight: &str,
    ) -> ResolvedFont {
        let name = font_name_for(store, source).to_string();
        let family = self
            .catalog
            .family_declaration(&name, source.generic_fallback());
        ResolvedFont {
            source,
            name,
            family,
            weight: weight.to_string(),
        }
    }
}

/// Site font name for a source, defaulting when the store has none.
pub fn font_name_for(store: &TokenStore, source: FontSource) -> &str {
    store.typography().font_name(source).unwrap_or(match source {
        FontSource::Primary => DEFAULT_PRIMARY_FONT,
        FontSource::Secondary => DEFAULT_SECONDARY_FONT,
    })
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

/// Ordered class set without duplicates.
#[derive(Debug, Default)]
struct ClassList(Vec<String>);

impl ClassList {
    fn push(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.0.contains(&class) {
            self.0.push(class);
        }
    }

    fn extend<'a>(&mut self, classes: impl IntoIterator<Item = &'a str>) {
        for class in classes {
            self.push(class);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{ThemeRecord, TokenValue};

    fn resolver() -> StyleResolver {
        StyleResolver::new(Arc::new(FontCatalog::bundled()))
    }

    fn key(variant: ButtonVariant, property: ButtonProperty) -> TokenKey {
        TokenKey::Button(variant, property)
    }

    #[test]
    fn empty_store_resolves_every_variant_and_style() {
        let resolver = resolver();
        let store = TokenStore::default_for("fresh");
        for style in GlobalButtonStyle::ALL {
            for variant in ButtonVariant::ALL {
                let descriptor = resolver.resolve_with_style(*variant, &store, *style);
                assert!(!descriptor.colors.hover.is_empty());
                assert!(!descriptor.colors.text.is_empty());
                assert!(!descriptor.font.family.is_empty());
                assert!(!descriptor.font.weight.is_empty());
                assert!(!descriptor.classes.is_empty());
                assert!(descriptor.icon.is_none());
                if variant.is_text_link() {
                    assert!(descriptor.colors.background.is_none());
                    assert!(descriptor.radius.is_none());
                    assert!(descriptor.size.is_none());
                    assert!(!descriptor.is_two_layer);
                } else {
                    assert!(descriptor.colors.background.is_some());
                    assert!(descriptor.colors.border.is_some());
                    assert!(descriptor.colors.shadow.is_some());
                    assert!(descriptor.radius.is_some());
                    assert!(descriptor.size.is_some());
                }
            }
        }
    }

    #[test]
    fn missing_global_style_is_default() {
        let resolver = resolver();
        let store = TokenStore::default_for("fresh");
        let descriptor = resolver.resolve(ButtonVariant::Primary, &store);
        assert_eq!(descriptor.global_style, GlobalButtonStyle::Default);
    }

    #[test]
    fn secondary_defaults_scenario() {
        let descriptor = resolver().resolve_with_style(
            ButtonVariant::Secondary,
            &TokenStore::default_for("fresh"),
            GlobalButtonStyle::Default,
        );
        assert_eq!(descriptor.colors.background.as_deref(), Some("#FFFFFF"));
        assert_eq!(descriptor.colors.text, "#000000");
        assert_eq!(descriptor.colors.border.as_deref(), Some("#E5E7EB"));
        assert_eq!(descriptor.colors.hover, "#F9FAFB");
        assert_eq!(descriptor.background_mode, BackgroundMode::Solid);
        assert!(descriptor.has_class("bg-[var(--secondary-button-background-color)]"));
        assert!(descriptor.has_class("hover:bg-[var(--secondary-button-hover-color)]"));
    }

    #[test]
    fn gradient_background_drops_hover_color_class() {
        let mut store = TokenStore::default_for("site");
        store
            .set(
                key(ButtonVariant::Primary, ButtonProperty::Background),
                "linear-gradient(135deg,#000,#fff)",
            )
            .unwrap();

        let descriptor = resolver().resolve_with_style(
            ButtonVariant::Primary,
            &store,
            GlobalButtonStyle::Floating,
        );

        assert_eq!(descriptor.background_mode, BackgroundMode::Gradient);
        assert_eq!(
            descriptor.inline_style.get("background").map(String::as_str),
            Some("linear-gradient(135deg,#000,#fff)")
        );
        assert!(descriptor.has_class("hover:opacity-90"));
        for class in ["shadow-lg", "hover:shadow-xl", "hover:-translate-y-0.5"] {
            assert!(descriptor.has_class(class), "missing {class}");
        }
        assert!(!descriptor
            .classes
            .iter()
            .any(|class| class.contains("hover-color")));
    }

    #[test]
    fn hex_background_keeps_hover_color_class() {
        let mut store = TokenStore::default_for("site");
        store
            .set(key(ButtonVariant::Primary, ButtonProperty::Background), "#123456")
            .unwrap();
        let descriptor = resolver().resolve(ButtonVariant::Primary, &store);
        assert_eq!(descriptor.background_mode, BackgroundMode::Solid);
        assert!(descriptor.has_class("hover:bg-[var(--primary-button-hover-color)]"));
        assert!(!descriptor.has_class("hover:opacity-90"));
        assert!(!descriptor.inline_style.contains_key("background"));
    }

    #[test]
    fn gradient_looking_text_color_stays_solid() {
        let record = ThemeRecord::from_json(
            r##"{
                "project_id": "site",
                "primary_button_text_color": "linear-gradient(90deg, #000, #fff)"
            }"##,
        )
        .unwrap();
        let store = TokenStore::from_record(&record);
        let descriptor = resolver().resolve(ButtonVariant::Primary, &store);
        assert_eq!(descriptor.background_mode, BackgroundMode::Solid);
        assert!(descriptor.has_class("text-[var(--primary-button-text-color)]"));
        assert!(!descriptor.inline_style.contains_key("background"));
    }

    #[test]
    fn tertiary_classes_use_outline_variables() {
        let descriptor =
            resolver().resolve(ButtonVariant::Tertiary, &TokenStore::default_for("site"));
        assert!(descriptor.has_class("bg-[var(--outline-background-color)]"));
        assert!(descriptor.has_class("text-[var(--outline-text-color)]"));
        assert!(descriptor
            .classes
            .iter()
            .all(|class| !class.contains("tertiary-button")));
    }

    #[test]
    fn offset_background_matches_radius_on_both_layers() {
        let mut store = TokenStore::default_for("site");
        store.set(TokenKey::GlobalButtonStyle, "offset-background").unwrap();
        store
            .set(key(ButtonVariant::Primary, ButtonProperty::Radius), "fully-rounded")
            .unwrap();

        let descriptor = resolver().resolve(ButtonVariant::Primary, &store);
        assert!(descriptor.is_two_layer);
        assert!(descriptor.has_class("rounded-full"));
        assert!(descriptor.has_class("before:rounded-full"));
        assert!(descriptor
            .background_layer_classes
            .iter()
            .any(|class| class == "rounded-full"));
        assert!(descriptor
            .background_layer_classes
            .iter()
            .any(|class| class == "bg-[var(--primary-button-shadow-color)]"));
    }

    #[test]
    fn text_link_is_never_two_layer() {
        let descriptor = resolver().resolve_with_style(
            ButtonVariant::TextLink,
            &TokenStore::default_for("site"),
            GlobalButtonStyle::OffsetBackground,
        );
        assert!(!descriptor.is_two_layer);
        assert!(descriptor.background_layer_classes.is_empty());
        assert!(descriptor.has_class("hover:text-[var(--text-link-hover-color)]"));
        assert!(!descriptor.classes.iter().any(|class| class.starts_with("rounded")));
    }

    #[test]
    fn compact_replaces_size_padding() {
        let mut store = TokenStore::default_for("site");
        store
            .set(key(ButtonVariant::Primary, ButtonProperty::Size), "large")
            .unwrap();
        let descriptor = resolver().resolve_with_style(
            ButtonVariant::Primary,
            &store,
            GlobalButtonStyle::Compact,
        );
        assert!(descriptor.has_class("px-3"));
        assert!(descriptor.has_class("py-1.5"));
        assert!(!descriptor.has_class("px-8"));
        assert_eq!(descriptor.size, Some(ButtonSize::Large));
    }

    #[test]
    fn tertiary_icon_defaults_to_right_chevron() {
        let mut store = TokenStore::default_for("site");
        store
            .set(key(ButtonVariant::Tertiary, ButtonProperty::IconEnabled), true)
            .unwrap();
        let icon = resolver()
            .resolve(ButtonVariant::Tertiary, &store)
            .icon
            .expect("icon enabled");
        assert_eq!(icon.position, IconPosition::Right);
        assert_eq!(icon.margin_class, "ml-2");
        assert_eq!(icon.icon.name, "chevron-right");
    }

    #[test]
    fn unknown_icon_name_falls_back_and_left_position_is_honoured() {
        let mut store = TokenStore::default_for("site");
        store
            .set(key(ButtonVariant::Primary, ButtonProperty::IconEnabled), true)
            .unwrap();
        store
            .set(key(ButtonVariant::Primary, ButtonProperty::IconName), "not-an-icon")
            .unwrap();
        store
            .set(key(ButtonVariant::Primary, ButtonProperty::IconPosition), "left")
            .unwrap();
        let icon = resolver()
            .resolve(ButtonVariant::Primary, &store)
            .icon
            .expect("icon enabled");
        assert_eq!(icon.icon.name, "chevron-right");
        assert_eq!(icon.margin_class, "mr-2");
    }

    #[test]
    fn font_resolves_through_source_and_catalog() {
        let mut store = TokenStore::default_for("site");
        store.set(TokenKey::SecondaryFont, "Lora").unwrap();
        store
            .set(key(ButtonVariant::Secondary, ButtonProperty::Font), "secondary")
            .unwrap();
        store
            .set(key(ButtonVariant::Secondary, ButtonProperty::Weight), "700")
            .unwrap();
        store.set(TokenKey::PrimaryFont, "House Grotesk").unwrap();

        let resolver = resolver();
        let secondary = resolver.resolve(ButtonVariant::Secondary, &store);
        assert_eq!(secondary.font.family, "'Lora', serif");
        assert_eq!(
            secondary.inline_style.get("font-weight").map(String::as_str),
            Some("700")
        );

        let primary = resolver.resolve(ButtonVariant::Primary, &store);
        assert_eq!(primary.font.name, "House Grotesk");
        assert_eq!(primary.font.family, "'House Grotesk', sans-serif");

        store.set(TokenKey::PrimaryFont, "Grandma's Hand").unwrap();
        let quoted = resolver.resolve(ButtonVariant::Primary, &store);
        assert_eq!(quoted.font.name, "Grandma's Hand");
        assert_eq!(
            quoted.inline_style.get("font-family").map(String::as_str),
            Some(r"'Grandma\'s Hand', sans-serif")
        );
    }

    #[test]
    fn default_fonts_are_used_for_empty_store() {
        let descriptor =
            resolver().resolve(ButtonVariant::TextLink, &TokenStore::default_for("site"));
        assert_eq!(descriptor.font.name, "Inter");
        assert_eq!(descriptor.font.family, "'Inter', sans-serif");
        assert_eq!(descriptor.font.weight, "500");
    }

    #[test]
    fn style_attr_lists_inline_overrides() {
        let mut store = TokenStore::default_for("site");
        store
            .set(key(ButtonVariant::Primary, ButtonProperty::Shadow), TokenValue::Unset)
            .unwrap();
        let descriptor = resolver().resolve(ButtonVariant::Primary, &store);
        let style = descriptor.style_attr();
        assert!(style.contains("--tw-shadow-color: rgba(0, 0, 0, 0.25);"));
        assert!(style.contains("font-family: 'Inter', sans-serif;"));
    }
}
