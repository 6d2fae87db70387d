use std::collections::BTreeMap;

use serde::Serialize;

use crate::theme::DEFAULT_ICON_NAME;

/// A named glyph as SVG path data on a 24x24 stroke grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub name: &'static str,
    pub paths: &'static [&'static str],
}

const BUILTIN_ICONS: &[Icon] = &[
    Icon {
        name: "chevron-right",
        paths: &["m9 18 6-6-6-6"],
    },
    Icon {
        name: "chevron-left",
        paths: &["m15 18-6-6 6-6"],
    },
    Icon {
        name: "arrow-right",
        paths: &["M5 12h14", "m12 5 7 7-7 7"],
    },
    Icon {
        name: "arrow-left",
        paths: &["m12 19-7-7 7-7", "M19 12H5"],
    },
    Icon {
        name: "arrow-up-right",
        paths: &["M7 7h10v10", "M7 17 17 7"],
    },
    Icon {
        name: "external-link",
        paths: &[
            "M15 3h6v6",
            "M10 14 21 3",
            "M18 13v6a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2h6",
        ],
    },
    Icon {
        name: "download",
        paths: &[
            "M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4",
            "m7 10 5 5 5-5",
            "M12 15V3",
        ],
    },
    Icon {
        name: "plus",
        paths: &["M5 12h14", "M12 5v14"],
    },
    Icon {
        name: "check",
        paths: &["M20 6 9 17l-5-5"],
    },
    Icon {
        name: "mail",
        paths: &[
            "m22 7-8.991 5.727a2 2 0 0 1-2.009 0L2 7",
            "M4 4h16a2 2 0 0 1 2 2v12a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2V6a2 2 0 0 1 2-2z",
        ],
    },
    Icon {
        name: "phone",
        paths: &[
            "M22 16.92v3a2 2 0 0 1-2.18 2 19.79 19.79 0 0 1-8.63-3.07 19.5 19.5 0 0 1-6-6 19.79 19.79 0 0 1-3.07-8.67A2 2 0 0 1 4.11 2h3a2 2 0 0 1 2 1.72c.127.96.361 1.903.7 2.81a2 2 0 0 1-.45 2.11L8.09 9.91a16 16 0 0 0 6 6l1.27-1.27a2 2 0 0 1 2.11-.45c.907.339 1.85.573 2.81.7A2 2 0 0 1 22 16.92z",
        ],
    },
    Icon {
        name: "shopping-cart",
        paths: &[
            "M8 21a1 1 0 1 0 0-2 1 1 0 0 0 0 2z",
            "M19 21a1 1 0 1 0 0-2 1 1 0 0 0 0 2z",
            "M2.05 2.05h2l2.66 12.42a2 2 0 0 0 2 1.58h9.78a2 2 0 0 0 1.95-1.57l1.65-7.43H5.12",
        ],
    },
    Icon {
        name: "calendar",
        paths: &[
            "M8 2v4",
            "M16 2v4",
            "M3 10h18",
            "M5 4h14a2 2 0 0 1 2 2v14a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V6a2 2 0 0 1 2-2z",
        ],
    },
    Icon {
        name: "play",
        paths: &["m6 3 14 9-14 9V3z"],
    },
    Icon {
        name: "sparkles",
        paths: &[
            "M9.937 15.5A2 2 0 0 0 8.5 14.063l-6.135-1.582a.5.5 0 0 1 0-.962L8.5 9.936A2 2 0 0 0 9.937 8.5l1.582-6.135a.5.5 0 0 1 .963 0L14.063 8.5A2 2 0 0 0 15.5 9.937l6.135 1.581a.5.5 0 0 1 0 .964L15.5 14.063a2 2 0 0 0-1.437 1.437l-1.582 6.135a.5.5 0 0 1-.963 0z",
        ],
    },
];

/// Shared lookup table for button icons.
#[derive(Debug, Clone)]
pub struct IconRegistry {
    icons: BTreeMap<&'static str, Icon>,
    fallback: Icon,
}

impl Default for IconRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IconRegistry {
    pub fn builtin() -> Self {
        let icons: BTreeMap<_, _> = BUILTIN_ICONS.iter().map(|icon| (icon.name, *icon)).collect();
        let fallback = icons
            .get(DEFAULT_ICON_NAME)
            .copied()
            .unwrap_or(BUILTIN_ICONS[0]);
        Self { icons, fallback }
    }

    pub fn get(&self, name: &str) -> Option<Icon> {
        self.icons.get(name.trim()).copied()
    }

    /// Named icon, or the right chevron when the name is absent or unknown.
    pub fn lookup_or_default(&self, name: Option<&str>) -> Icon {
        match name.and_then(|name| self.get(name)) {
            Some(icon) => icon,
            None => {
                if let Some(name) = name {
                    tracing::debug!(icon = %name, "unknown icon name; using default");
                }
                self.fallback
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.icons.keys().copied()
    }
}
