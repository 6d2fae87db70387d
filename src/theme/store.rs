use std::collections::BTreeMap;
use std::str::FromStr;

use super::defaults::default_value;
use super::record::ThemeRecord;
use super::tokens::{
    ButtonProperty, ButtonRadius, ButtonSize, ButtonVariant, FontSource, GlobalButtonStyle,
    GradientSlot, IconPosition, PaletteColor, TextRole, TokenKey, TokenValue, TypographyProperty,
};
use super::{is_gradient_expression, ThemeError, ThemeResult};

/// Settings every button variant has, text links included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonButtonTokens {
    pub hover_color: Option<String>,
    pub text_color: Option<String>,
    pub font_source: Option<FontSource>,
    pub font_weight: Option<String>,
}

/// Settings for variants rendered as a box: primary, secondary and tertiary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxButtonTokens {
    pub common: CommonButtonTokens,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub shadow_color: Option<String>,
    pub radius: Option<ButtonRadius>,
    pub size: Option<ButtonSize>,
    pub icon_enabled: Option<bool>,
    pub icon_position: Option<IconPosition>,
    pub icon_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonTokens {
    pub primary: BoxButtonTokens,
    pub secondary: BoxButtonTokens,
    /// Tertiary button, kept under its legacy `outline` name.
    pub outline: BoxButtonTokens,
    pub text_link: CommonButtonTokens,
}

/// Borrowed view of one variant's settings, shaped by what the variant supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantTokens<'a> {
    Boxed(&'a BoxButtonTokens),
    TextLink(&'a CommonButtonTokens),
}

impl<'a> VariantTokens<'a> {
    pub fn common(self) -> &'a CommonButtonTokens {
        match self {
            Self::Boxed(tokens) => &tokens.common,
            Self::TextLink(tokens) => tokens,
        }
    }

    pub fn boxed(self) -> Option<&'a BoxButtonTokens> {
        match self {
            Self::Boxed(tokens) => Some(tokens),
            Self::TextLink(_) => None,
        }
    }
}

impl ButtonTokens {
    pub fn variant(&self, variant: ButtonVariant) -> VariantTokens<'_> {
        match variant {
            ButtonVariant::Primary => VariantTokens::Boxed(&self.primary),
            ButtonVariant::Secondary => VariantTokens::Boxed(&self.secondary),
            ButtonVariant::Tertiary => VariantTokens::Boxed(&self.outline),
            ButtonVariant::TextLink => VariantTokens::TextLink(&self.text_link),
        }
    }

    fn boxed_mut(&mut self, variant: ButtonVariant) -> Option<&mut BoxButtonTokens> {
        match variant {
            ButtonVariant::Primary => Some(&mut self.primary),
            ButtonVariant::Secondary => Some(&mut self.secondary),
            ButtonVariant::Tertiary => Some(&mut self.outline),
            ButtonVariant::TextLink => None,
        }
    }

    fn common_mut(&mut self, variant: ButtonVariant) -> &mut CommonButtonTokens {
        match variant {
            ButtonVariant::Primary => &mut self.primary.common,
            ButtonVariant::Secondary => &mut self.secondary.common,
            ButtonVariant::Tertiary => &mut self.outline.common,
            ButtonVariant::TextLink => &mut self.text_link,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRoleTokens {
    pub font_source: Option<FontSource>,
    pub size: Option<String>,
    pub weight: Option<String>,
    pub line_height: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Typography {
    pub primary_font: Option<String>,
    pub secondary_font: Option<String>,
    roles: [TextRoleTokens; TextRole::COUNT],
}

impl Typography {
    pub fn role(&self, role: TextRole) -> &TextRoleTokens {
        &self.roles[role.index()]
    }

    fn role_mut(&mut self, role: TextRole) -> &mut TextRoleTokens {
        &mut self.roles[role.index()]
    }

    pub fn font_name(&self, source: FontSource) -> Option<&str> {
        match source {
            FontSource::Primary => self.primary_font.as_deref(),
            FontSource::Secondary => self.secondary_font.as_deref(),
        }
    }
}

/// In-memory design tokens for one project. Every token is optional; readers
/// fall back to the documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStore {
    id: Option<String>,
    project_id: String,
    palette: BTreeMap<PaletteColor, String>,
    gradients: BTreeMap<GradientSlot, String>,
    typography: Typography,
    buttons: ButtonTokens,
    global_button_style: Option<GlobalButtonStyle>,
}

impl TokenStore {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    /// Empty store for a project with no saved theme yet.
    pub fn default_for(project_id: impl Into<String>) -> Self {
        Self::new(project_id)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Records the identifier assigned by the first successful insert.
    pub fn assign_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn palette(&self, color: PaletteColor) -> Option<&str> {
        self.palette.get(&color).map(String::as_str)
    }

    pub fn gradient(&self, slot: GradientSlot) -> Option<&str> {
        self.gradients.get(&slot).map(String::as_str)
    }

    pub fn typography(&self) -> &Typography {
        &self.typography
    }

    pub fn buttons(&self) -> &ButtonTokens {
        &self.buttons
    }

    pub fn global_button_style(&self) -> Option<GlobalButtonStyle> {
        self.global_button_style
    }

    /// Stored value only; `Unset` when the token was never chosen.
    pub fn get(&self, key: TokenKey) -> TokenValue {
        let text = |value: Option<&str>| {
            value.map_or(TokenValue::Unset, |v| TokenValue::Text(v.to_string()))
        };
        let named = |value: Option<&'static str>| text(value);
        match key {
            TokenKey::Palette(color) => text(self.palette(color)),
            TokenKey::Gradient(slot) => text(self.gradient(slot)),
            TokenKey::PrimaryFont => text(self.typography.primary_font.as_deref()),
            TokenKey::SecondaryFont => text(self.typography.secondary_font.as_deref()),
            TokenKey::Typography(role, property) => {
                let tokens = self.typography.role(role);
                match property {
                    TypographyProperty::FontSource => {
                        named(tokens.font_source.map(FontSource::as_str))
                    }
                    TypographyProperty::Size => text(tokens.size.as_deref()),
                    TypographyProperty::Weight => text(tokens.weight.as_deref()),
                    TypographyProperty::LineHeight => text(tokens.line_height.as_deref()),
                }
            }
            TokenKey::Button(variant, property) => {
                let view = self.buttons.variant(variant);
                let common = view.common();
                match (property, view.boxed()) {
                    (ButtonProperty::Hover, _) => text(common.hover_color.as_deref()),
                    (ButtonProperty::Text, _) => text(common.text_color.as_deref()),
                    (ButtonProperty::Font, _) => named(common.font_source.map(FontSource::as_str)),
                    (ButtonProperty::Weight, _) => text(common.font_weight.as_deref()),
                    (_, None) => TokenValue::Unset,
                    (ButtonProperty::Background, Some(boxed)) => {
                        text(boxed.background_color.as_deref())
                    }
                    (ButtonProperty::Border, Some(boxed)) => text(boxed.border_color.as_deref()),
                    (ButtonProperty::Shadow, Some(boxed)) => text(boxed.shadow_color.as_deref()),
                    (ButtonProperty::Radius, Some(boxed)) => {
                        named(boxed.radius.map(ButtonRadius::as_str))
                    }
                    (ButtonProperty::Size, Some(boxed)) => {
                        named(boxed.size.map(ButtonSize::as_str))
                    }
                    (ButtonProperty::IconEnabled, Some(boxed)) => {
                        boxed.icon_enabled.map_or(TokenValue::Unset, TokenValue::Flag)
                    }
                    (ButtonProperty::IconPosition, Some(boxed)) => {
                        named(boxed.icon_position.map(IconPosition::as_str))
                    }
                    (ButtonProperty::IconName, Some(boxed)) => text(boxed.icon_name.as_deref()),
                }
            }
            TokenKey::GlobalButtonStyle => {
                named(self.global_button_style.map(GlobalButtonStyle::as_str))
            }
        }
    }

    /// Stored value, or the documented default when unset.
    pub fn resolve(&self, key: TokenKey) -> TokenValue {
        match self.get(key) {
            TokenValue::Unset => default_value(key).unwrap_or(TokenValue::Unset),
            value => value,
        }
    }

    /// Editor-facing mutation. Rejects properties the variant lacks and
    /// gradients on solid-only fields.
    pub fn set(&mut self, key: TokenKey, value: impl Into<TokenValue>) -> ThemeResult<()> {
        let value = value.into();
        if let TokenKey::Button(variant, property) = key {
            if !variant.supports(property) {
                return Err(ThemeError::UnsupportedProperty { variant, property });
            }
            if property.is_solid_only() && value.is_gradient() {
                return Err(ThemeError::GradientNotAllowed {
                    key: key.record_key(),
                });
            }
        }
        self.assign(key, value)
    }

    fn assign(&mut self, key: TokenKey, value: TokenValue) -> ThemeResult<()> {
        match key {
            TokenKey::Palette(color) => {
                let mut slot = self.palette.remove(&color);
                assign_text(&mut slot, value)?;
                if let Some(slot) = slot {
                    self.palette.insert(color, slot);
                }
                Ok(())
            }
            TokenKey::Gradient(gradient) => {
                let mut slot = self.gradients.remove(&gradient);
                assign_text(&mut slot, value)?;
                if let Some(slot) = slot {
                    self.gradients.insert(gradient, slot);
                }
                Ok(())
            }
            TokenKey::PrimaryFont => assign_text(&mut self.typography.primary_font, value),
            TokenKey::SecondaryFont => assign_text(&mut self.typography.secondary_font, value),
            TokenKey::Typography(role, property) => {
                let tokens = self.typography.role_mut(role);
                match property {
                    TypographyProperty::FontSource => assign_parsed(&mut tokens.font_source, value),
                    TypographyProperty::Size => assign_text(&mut tokens.size, value),
                    TypographyProperty::Weight => assign_text(&mut tokens.weight, value),
                    TypographyProperty::LineHeight => assign_text(&mut tokens.line_height, value),
                }
            }
            TokenKey::Button(variant, property) => self.assign_button(variant, property, value),
            TokenKey::GlobalButtonStyle => assign_parsed(&mut self.global_button_style, value),
        }
    }

    fn assign_button(
        &mut self,
        variant: ButtonVariant,
        property: ButtonProperty,
        value: TokenValue,
    ) -> ThemeResult<()> {
        let common = self.buttons.common_mut(variant);
        match property {
            ButtonProperty::Hover => return assign_text(&mut common.hover_color, value),
            ButtonProperty::Text => return assign_text(&mut common.text_color, value),
            ButtonProperty::Font => return assign_parsed(&mut common.font_source, value),
            ButtonProperty::Weight => return assign_text(&mut common.font_weight, value),
            _ => {}
        }

        let boxed = self
            .buttons
            .boxed_mut(variant)
            .ok_or(ThemeError::UnsupportedProperty { variant, property })?;
        match property {
            ButtonProperty::Background => assign_text(&mut boxed.background_color, value),
            ButtonProperty::Border => assign_text(&mut boxed.border_color, value),
            ButtonProperty::Shadow => assign_text(&mut boxed.shadow_color, value),
            ButtonProperty::Radius => assign_parsed(&mut boxed.radius, value),
            ButtonProperty::Size => assign_parsed(&mut boxed.size, value),
            ButtonProperty::IconEnabled => assign_flag(&mut boxed.icon_enabled, value),
            ButtonProperty::IconPosition => assign_parsed(&mut boxed.icon_position, value),
            ButtonProperty::IconName => assign_text(&mut boxed.icon_name, value),
            ButtonProperty::Hover
            | ButtonProperty::Text
            | ButtonProperty::Font
            | ButtonProperty::Weight => Ok(()),
        }
    }

    /// Builds a store from a persisted record. Columns that fail to parse are
    /// logged and skipped so stored data never blocks the editor.
    pub fn from_record(record: &ThemeRecord) -> Self {
        let mut store = Self::new(record.project_id.clone());
        store.id = record.id.clone();

        for (column, raw) in &record.tokens {
            let Some(key) = TokenKey::from_record_key(column) else {
                tracing::debug!(column = %column, "ignoring unknown theme column");
                continue;
            };
            let Some(value) = TokenValue::from_json(raw) else {
                tracing::warn!(column = %column, "theme column holds a non-scalar value");
                continue;
            };
            if let Err(err) = store.assign(key, value) {
                tracing::warn!(column = %column, %err, "skipping invalid theme column");
            }
        }

        store
    }

    /// Full snapshot of every chosen token, suitable for insert or update.
    pub fn to_record(&self) -> ThemeRecord {
        let mut record = ThemeRecord::new(self.project_id.clone());
        record.id = self.id.clone();
        for key in TokenKey::all() {
            let value = self.get(key);
            if !value.is_unset() {
                record.tokens.insert(key.record_key(), value.to_json());
            }
        }
        record
    }
}

fn assign_text(slot: &mut Option<String>, value: TokenValue) -> ThemeResult<()> {
    match value {
        TokenValue::Text(text) => {
            let trimmed = text.trim();
            *slot = (!trimmed.is_empty()).then(|| trimmed.to_string());
            Ok(())
        }
        TokenValue::Unset => {
            *slot = None;
            Ok(())
        }
        TokenValue::Flag(flag) => Err(ThemeError::InvalidValue {
            token: "text token",
            value: flag.to_string(),
        }),
    }
}

fn assign_parsed<T>(slot: &mut Option<T>, value: TokenValue) -> ThemeResult<()>
where
    T: FromStr<Err = ThemeError>,
{
    match value {
        TokenValue::Text(text) if text.trim().is_empty() => {
            *slot = None;
            Ok(())
        }
        TokenValue::Text(text) => {
            *slot = Some(text.parse()?);
            Ok(())
        }
        TokenValue::Unset => {
            *slot = None;
            Ok(())
        }
        TokenValue::Flag(flag) => Err(ThemeError::InvalidValue {
            token: "named token",
            value: flag.to_string(),
        }),
    }
}

fn assign_flag(slot: &mut Option<bool>, value: TokenValue) -> ThemeResult<()> {
    match value {
        TokenValue::Flag(flag) => *slot = Some(flag),
        TokenValue::Unset => *slot = None,
        TokenValue::Text(text) => match text.trim() {
            "true" => *slot = Some(true),
            "false" => *slot = Some(false),
            other => {
                return Err(ThemeError::InvalidValue {
                    token: "flag",
                    value: other.to_string(),
                })
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(variant: ButtonVariant, property: ButtonProperty) -> TokenKey {
        TokenKey::Button(variant, property)
    }

    #[test]
    fn tertiary_text_color_reads_and_writes_outline_column() {
        let mut store = TokenStore::new("site");
        store
            .set(button(ButtonVariant::Tertiary, ButtonProperty::Text), "#FF0000")
            .unwrap();

        assert_eq!(store.buttons().outline.common.text_color.as_deref(), Some("#FF0000"));
        let record = store.to_record();
        assert_eq!(record.get_str("outline_text_color"), Some("#FF0000"));
        assert!(record
            .tokens
            .keys()
            .all(|column| !column.starts_with("tertiary_button_")));

        let mut loaded = ThemeRecord::new("site");
        loaded
            .tokens
            .insert("outline_text_color".into(), serde_json::json!("#00FF00"));
        let reloaded = TokenStore::from_record(&loaded);
        assert_eq!(
            reloaded.get(button(ButtonVariant::Tertiary, ButtonProperty::Text)),
            TokenValue::Text("#00FF00".into())
        );
    }

    #[test]
    fn text_link_rejects_box_properties() {
        let mut store = TokenStore::new("site");
        let err = store
            .set(button(ButtonVariant::TextLink, ButtonProperty::Radius), "squared")
            .unwrap_err();
        assert!(matches!(
            err,
            ThemeError::UnsupportedProperty {
                variant: ButtonVariant::TextLink,
                property: ButtonProperty::Radius
            }
        ));
        assert_eq!(store, TokenStore::new("site"));
    }

    #[test]
    fn solid_only_fields_reject_gradients() {
        let mut store = TokenStore::new("site");
        for property in [ButtonProperty::Text, ButtonProperty::Border, ButtonProperty::Shadow] {
            let err = store
                .set(
                    button(ButtonVariant::Primary, property),
                    "linear-gradient(90deg, #000, #fff)",
                )
                .unwrap_err();
            assert!(matches!(err, ThemeError::GradientNotAllowed { .. }));
        }

        store
            .set(
                button(ButtonVariant::Primary, ButtonProperty::Background),
                "linear-gradient(90deg, #000, #fff)",
            )
            .unwrap();
        assert!(store
            .get(button(ButtonVariant::Primary, ButtonProperty::Background))
            .is_gradient());
    }

    #[test]
    fn unset_clears_a_token() {
        let mut store = TokenStore::new("site");
        let key = TokenKey::Palette(PaletteColor::Dark);
        store.set(key, "#101010").unwrap();
        assert_eq!(store.palette(PaletteColor::Dark), Some("#101010"));
        store.set(key, TokenValue::Unset).unwrap();
        assert_eq!(store.palette(PaletteColor::Dark), None);
        assert_eq!(store.resolve(key), TokenValue::Text("#111827".into()));
    }

    #[test]
    fn named_tokens_are_parsed() {
        let mut store = TokenStore::new("site");
        store
            .set(button(ButtonVariant::Primary, ButtonProperty::Radius), "fully-rounded")
            .unwrap();
        store
            .set(button(ButtonVariant::Secondary, ButtonProperty::IconEnabled), true)
            .unwrap();
        store.set(TokenKey::GlobalButtonStyle, "brick").unwrap();

        assert_eq!(store.buttons().primary.radius, Some(ButtonRadius::FullyRounded));
        assert_eq!(store.buttons().secondary.icon_enabled, Some(true));
        assert_eq!(store.global_button_style(), Some(GlobalButtonStyle::Brick));

        let err = store
            .set(button(ButtonVariant::Primary, ButtonProperty::Size), "huge")
            .unwrap_err();
        assert!(matches!(err, ThemeError::InvalidValue { .. }));
    }

    #[test]
    fn record_round_trip_preserves_identity_and_tokens() {
        let mut store = TokenStore::new("site-a");
        store.assign_id("theme-7");
        store
            .set(TokenKey::Typography(TextRole::H2, TypographyProperty::Size), "2rem")
            .unwrap();
        store.set(TokenKey::PrimaryFont, "Roboto").unwrap();
        store
            .set(button(ButtonVariant::Tertiary, ButtonProperty::IconPosition), "left")
            .unwrap();

        let record = store.to_record();
        assert_eq!(record.id.as_deref(), Some("theme-7"));
        assert_eq!(record.get_str("h2_size"), Some("2rem"));
        assert_eq!(record.get_str("outline_icon_position"), Some("left"));
        assert_eq!(TokenStore::from_record(&record), store);
    }

    #[test]
    fn from_record_skips_invalid_columns() {
        let record = ThemeRecord::from_json(
            r##"{
                "project_id": "site",
                "primary_button_radius": "blob",
                "secondary_button_size": "large",
                "text_link_radius": "squared",
                "legacy_column": 3
            }"##,
        )
        .unwrap();
        let store = TokenStore::from_record(&record);
        assert_eq!(store.buttons().primary.radius, None);
        assert_eq!(store.buttons().secondary.size, Some(ButtonSize::Large));
    }

    #[test]
    fn from_record_keeps_stored_gradients_on_solid_fields() {
        let record = ThemeRecord::from_json(
            r##"{
                "project_id": "site",
                "primary_button_text_color": "linear-gradient(90deg, #000, #fff)"
            }"##,
        )
        .unwrap();
        let store = TokenStore::from_record(&record);
        assert!(store
            .get(button(ButtonVariant::Primary, ButtonProperty::Text))
            .is_gradient());
    }

    #[test]
    fn empty_store_resolves_every_key() {
        let store = TokenStore::new("site");
        for key in TokenKey::all() {
            assert!(!store.resolve(key).is_unset(), "{key:?} resolved to unset");
        }
    }
}
