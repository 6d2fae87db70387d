use super::tokens::{
    ButtonProperty, ButtonRadius, ButtonSize, ButtonVariant, FontSource, GlobalButtonStyle,
    GradientSlot, IconPosition, PaletteColor, TextRole, TokenKey, TokenValue, TypographyProperty,
};

pub const DEFAULT_PRIMARY_FONT: &str = "Inter";
pub const DEFAULT_SECONDARY_FONT: &str = "Merriweather";
pub const DEFAULT_ICON_NAME: &str = "chevron-right";

/// Hard-coded fallbacks for one button variant.
///
/// `None` marks a property the variant does not have at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonDefaults {
    pub background: Option<&'static str>,
    pub hover: &'static str,
    pub text: &'static str,
    pub border: Option<&'static str>,
    pub shadow: Option<&'static str>,
    pub radius: Option<ButtonRadius>,
    pub size: Option<ButtonSize>,
    pub icon_enabled: Option<bool>,
    pub icon_position: Option<IconPosition>,
    pub icon_name: Option<&'static str>,
    pub font_source: FontSource,
    pub font_weight: &'static str,
}

const BOX_BUTTON_SHAPE: ButtonDefaults = ButtonDefaults {
    background: Some("#000000"),
    hover: "#1F2937",
    text: "#FFFFFF",
    border: Some("#000000"),
    shadow: Some("rgba(0, 0, 0, 0.25)"),
    radius: Some(ButtonRadius::SlightlyRounded),
    size: Some(ButtonSize::Medium),
    icon_enabled: Some(false),
    icon_position: Some(IconPosition::Right),
    icon_name: Some(DEFAULT_ICON_NAME),
    font_source: FontSource::Primary,
    font_weight: "500",
};

pub const fn button_defaults(variant: ButtonVariant) -> ButtonDefaults {
    match variant {
        ButtonVariant::Primary => BOX_BUTTON_SHAPE,
        ButtonVariant::Secondary => ButtonDefaults {
            background: Some("#FFFFFF"),
            hover: "#F9FAFB",
            text: "#000000",
            border: Some("#E5E7EB"),
            shadow: Some("rgba(0, 0, 0, 0.1)"),
            ..BOX_BUTTON_SHAPE
        },
        ButtonVariant::Tertiary => ButtonDefaults {
            background: Some("transparent"),
            hover: "#F3F4F6",
            text: "#000000",
            border: Some("#000000"),
            shadow: Some("rgba(0, 0, 0, 0.1)"),
            ..BOX_BUTTON_SHAPE
        },
        ButtonVariant::TextLink => ButtonDefaults {
            background: None,
            hover: "#4B5563",
            text: "#000000",
            border: None,
            shadow: None,
            radius: None,
            size: None,
            icon_enabled: None,
            icon_position: None,
            icon_name: None,
            font_source: FontSource::Primary,
            font_weight: "500",
        },
    }
}

pub const fn palette_default(color: PaletteColor) -> &'static str {
    match color {
        PaletteColor::Primary => "#000000",
        PaletteColor::Secondary => "#4B5563",
        PaletteColor::Tertiary => "#9CA3AF",
        PaletteColor::Dark => "#111827",
        PaletteColor::Light => "#F9FAFB",
        PaletteColor::White => "#FFFFFF",
        PaletteColor::SoftShade1 => "#F3F4F6",
        PaletteColor::SoftShade2 => "#E5E7EB",
        PaletteColor::SoftShade3 => "#D1D5DB",
    }
}

pub const fn gradient_default(slot: GradientSlot) -> &'static str {
    match slot {
        GradientSlot::Gradient1 => "linear-gradient(135deg, #000000 0%, #4B5563 100%)",
        GradientSlot::Gradient2 => "linear-gradient(135deg, #F9FAFB 0%, #E5E7EB 100%)",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRoleDefaults {
    pub font_source: FontSource,
    pub size: &'static str,
    pub weight: &'static str,
    pub line_height: &'static str,
}

pub const fn text_role_default(role: TextRole) -> TextRoleDefaults {
    let (size, weight, line_height) = match role {
        TextRole::H1 => ("3rem", "700", "1.2"),
        TextRole::H2 => ("2.25rem", "700", "1.25"),
        TextRole::H3 => ("1.875rem", "600", "1.3"),
        TextRole::H4 => ("1.5rem", "600", "1.35"),
        TextRole::H5 => ("1.25rem", "600", "1.4"),
        TextRole::H6 => ("1rem", "600", "1.5"),
        TextRole::Paragraph => ("1rem", "400", "1.6"),
    };
    let font_source = match role {
        TextRole::Paragraph => FontSource::Secondary,
        _ => FontSource::Primary,
    };
    TextRoleDefaults {
        font_source,
        size,
        weight,
        line_height,
    }
}

/// Documented fallback for any key; `None` only for properties a variant lacks.
pub fn default_value(key: TokenKey) -> Option<TokenValue> {
    let text = |value: &'static str| Some(TokenValue::Text(value.to_string()));
    match key {
        TokenKey::Palette(color) => text(palette_default(color)),
        TokenKey::Gradient(slot) => text(gradient_default(slot)),
        TokenKey::PrimaryFont => text(DEFAULT_PRIMARY_FONT),
        TokenKey::SecondaryFont => text(DEFAULT_SECONDARY_FONT),
        TokenKey::Typography(role, property) => {
            let defaults = text_role_default(role);
            match property {
                TypographyProperty::FontSource => text(defaults.font_source.as_str()),
                TypographyProperty::Size => text(defaults.size),
                TypographyProperty::Weight => text(defaults.weight),
                TypographyProperty::LineHeight => text(defaults.line_height),
            }
        }
        TokenKey::Button(variant, property) => {
            let defaults = button_defaults(variant);
            match property {
                ButtonProperty::Background => defaults.background.and_then(text),
                ButtonProperty::Hover => text(defaults.hover),
                ButtonProperty::Text => text(defaults.text),
                ButtonProperty::Border => defaults.border.and_then(text),
                ButtonProperty::Shadow => defaults.shadow.and_then(text),
                ButtonProperty::Radius => defaults.radius.and_then(|r| text(r.as_str())),
                ButtonProperty::Size => defaults.size.and_then(|s| text(s.as_str())),
                ButtonProperty::IconEnabled => defaults.icon_enabled.map(TokenValue::Flag),
                ButtonProperty::IconPosition => {
                    defaults.icon_position.and_then(|p| text(p.as_str()))
                }
                ButtonProperty::IconName => defaults.icon_name.and_then(text),
                ButtonProperty::Font => text(defaults.font_source.as_str()),
                ButtonProperty::Weight => text(defaults.font_weight),
            }
        }
        TokenKey::GlobalButtonStyle => text(GlobalButtonStyle::default().as_str()),
    }
}
