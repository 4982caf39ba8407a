use std::collections::HashMap;

pub const PALETTE: [&str; 8] = [
    "#4CAF50", "#2196F3", "#FF9800", "#9C27B0", "#E91E63", "#3F51B5", "#009688", "#FFC107",
];

/// Habit name → marker color. Assignments are never revised for the life of
/// the map; past the palette size colors repeat.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    colors: HashMap<String, &'static str>,
}

impl ColorMap {
    pub fn assign<'a>(&mut self, names: impl IntoIterator<Item = &'a String>) {
        for name in names {
            if self.colors.contains_key(name) {
                continue;
            }
            let color = PALETTE[self.colors.len() % PALETTE.len()];
            self.colors.insert(name.clone(), color);
        }
    }

    pub fn get(&self, name: &str) -> Option<&'static str> {
        self.colors.get(name).copied()
    }

    pub fn color_of(&self, name: &str) -> &'static str {
        self.get(name).unwrap_or(PALETTE[0])
    }
}
