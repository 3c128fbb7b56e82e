//! Image gallery and lightbox state

/// Galleries smaller than this are not shown
pub const MIN_GALLERY_IMAGES: usize = 2;

/// Keys the lightbox reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxKey {
    Left,
    Right,
    Escape,
}

/// Whether the gallery grid is shown for `count` images
pub fn should_render_grid(count: usize) -> bool {
    count >= MIN_GALLERY_IMAGES
}

/// Lightbox over a fixed number of images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lightbox {
    len: usize,
    selected: Option<usize>,
}

impl Lightbox {
    /// Closed lightbox over `len` images
    pub fn new(len: usize) -> Self {
        Self { len, selected: None }
    }

    /// Index of the open image
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Open at `index`; out-of-range indices are ignored
    pub fn open(&mut self, index: usize) {
        if index < self.len {
            self.selected = Some(index);
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Advance, wrapping from the last image to the first
    pub fn next(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some(if i + 1 >= self.len { 0 } else { i + 1 });
        }
    }

    /// Step back, wrapping from the first image to the last
    pub fn previous(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some(if i == 0 { self.len - 1 } else { i - 1 });
        }
    }

    /// Handle a key; returns `true` if it was consumed.
    ///
    /// Keys are ignored while the lightbox is closed.
    pub fn handle_key(&mut self, key: LightboxKey) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            LightboxKey::Left => self.previous(),
            LightboxKey::Right => self.next(),
            LightboxKey::Escape => self.close(),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_both_ways() {
        let mut lightbox = Lightbox::new(3);
        lightbox.open(0);
        lightbox.previous();
        assert_eq!(lightbox.selected(), Some(2));
        lightbox.next();
        assert_eq!(lightbox.selected(), Some(0));
        lightbox.next();
        lightbox.next();
        assert_eq!(lightbox.selected(), Some(2));
    }

    #[test]
    fn test_keys_only_while_open() {
        let mut lightbox = Lightbox::new(3);
        assert!(!lightbox.handle_key(LightboxKey::Right));
        assert_eq!(lightbox.selected(), None);

        lightbox.open(2);
        assert!(lightbox.handle_key(LightboxKey::Right));
        assert_eq!(lightbox.selected(), Some(0));
        assert!(lightbox.handle_key(LightboxKey::Left));
        assert_eq!(lightbox.selected(), Some(2));
        assert!(lightbox.handle_key(LightboxKey::Escape));
        assert!(!lightbox.is_open());
    }

    #[test]
    fn test_open_out_of_range_ignored() {
        let mut lightbox = Lightbox::new(2);
        lightbox.open(5);
        assert!(!lightbox.is_open());
    }

    #[test]
    fn test_grid_needs_two_images() {
        assert!(!should_render_grid(0));
        assert!(!should_render_grid(1));
        assert!(should_render_grid(2));
    }
}
