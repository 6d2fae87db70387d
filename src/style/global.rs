use crate::theme::GlobalButtonStyle;

/// Classes a global button style layers on top of the background classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleOverlay {
    pub classes: &'static [&'static str],
    /// Replaces the size padding instead of adding to it.
    pub padding: Option<&'static [&'static str]>,
    pub two_layer: bool,
}

/// Background layer placed behind the foreground in a two-layer render.
/// It sits offset and slides into place on hover.
pub const OFFSET_LAYER_CLASSES: &[&str] = &[
    "absolute",
    "inset-0",
    "-z-10",
    "translate-x-1.5",
    "translate-y-1.5",
    "transition-transform",
    "duration-200",
    "group-hover:translate-x-0",
    "group-hover:translate-y-0",
];

const NO_OVERLAY: StyleOverlay = StyleOverlay {
    classes: &[],
    padding: None,
    two_layer: false,
};

pub const fn overlay(style: GlobalButtonStyle) -> StyleOverlay {
    match style {
        GlobalButtonStyle::Default => NO_OVERLAY,
        GlobalButtonStyle::Floating => StyleOverlay {
            classes: &[
                "shadow-lg",
                "hover:shadow-xl",
                "hover:-translate-y-0.5",
                "transition-all",
                "duration-200",
            ],
            ..NO_OVERLAY
        },
        GlobalButtonStyle::Brick => StyleOverlay {
            classes: &[
                "border-2",
                "shadow-[4px_4px_0_0_var(--tw-shadow-color)]",
                "hover:translate-x-[2px]",
                "hover:translate-y-[2px]",
                "hover:shadow-[2px_2px_0_0_var(--tw-shadow-color)]",
                "transition-all",
                "duration-150",
            ],
            ..NO_OVERLAY
        },
        GlobalButtonStyle::Modern => StyleOverlay {
            classes: &["uppercase", "tracking-wider", "font-semibold"],
            ..NO_OVERLAY
        },
        GlobalButtonStyle::OffsetBackground => StyleOverlay {
            classes: &[
                "relative",
                "z-10",
                "group",
                "hover:translate-x-0.5",
                "hover:translate-y-0.5",
                "transition-transform",
                "duration-200",
            ],
            padding: None,
            two_layer: true,
        },
        GlobalButtonStyle::Compact => StyleOverlay {
            classes: &["leading-tight"],
            padding: Some(&["px-3", "py-1.5", "text-sm"]),
            two_layer: false,
        },
    }
}
