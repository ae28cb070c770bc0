use crate::domain::{TagId, TaggedElement};
use crate::error::{Result, TagError};
use crate::photo::{ImageId, ImageResource};

/// Uploaded images plus the active one
#[derive(Clone, Debug, Default)]
pub struct ImageSet {
    images: Vec<ImageResource>,
    current: Option<usize>,
}

impl ImageSet {
    /// New set with the first image (if any) active
    pub fn new(images: Vec<ImageResource>) -> Self {
        let current = if images.is_empty() { None } else { Some(0) };
        Self { images, current }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[ImageResource] {
        &self.images
    }

    pub fn get(&self, index: usize) -> Option<&ImageResource> {
        self.images.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&ImageResource> {
        self.current.and_then(|i| self.images.get(i))
    }

    /// Position of an image by its stable id
    pub fn position(&self, id: ImageId) -> Option<usize> {
        self.images.iter().position(|img| img.id() == id)
    }

    /// Make `index` the active image
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.images.len() {
            return Err(TagError::ImageIndexOutOfRange {
                index,
                len: self.images.len(),
            });
        }
        self.current = Some(index);
        Ok(())
    }
}

/// Committed tags in insertion order
#[derive(Clone, Debug, Default)]
pub struct TagStore {
    elements: Vec<TaggedElement>,
}

impl TagStore {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn all(&self) -> &[TaggedElement] {
        &self.elements
    }

    pub fn get(&self, id: TagId) -> Option<&TaggedElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Append a committed tag
    pub fn add(&mut self, element: TaggedElement) -> Result<()> {
        if self.get(element.id).is_some() {
            return Err(TagError::DuplicateTag(element.id));
        }
        self.elements.push(element);
        Ok(())
    }

    /// Remove exactly one tag
    pub fn remove(&mut self, id: TagId) -> Result<TaggedElement> {
        let pos = self
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or(TagError::TagNotFound(id))?;
        Ok(self.elements.remove(pos))
    }

    /// Tags on one image, in insertion order
    pub fn elements_for(&self, image_index: usize) -> impl Iterator<Item = &TaggedElement> {
        self.elements
            .iter()
            .filter(move |e| e.image_index == image_index)
    }

    /// Remove every tag on one image, returning how many were removed
    pub fn clear_image(&mut self, image_index: usize) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| e.image_index != image_index);
        before - self.elements.len()
    }

    /// Re-point tags at a new image set by stable id
    ///
    /// Tags whose image is gone are dropped and returned.
    pub fn reindex(&mut self, images: &ImageSet) -> Vec<TaggedElement> {
        let mut orphaned = Vec::new();
        let mut kept = Vec::with_capacity(self.elements.len());
        for mut element in self.elements.drain(..) {
            match images.position(element.image_id) {
                Some(index) => {
                    element.image_index = index;
                    kept.push(element);
                }
                None => orphaned.push(element),
            }
        }
        self.elements = kept;
        orphaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bounds, CroppedImage, RegionShape};

    fn images(n: usize) -> Vec<ImageResource> {
        (0..n)
            .map(|i| ImageResource::new(format!("photo-{i}.png"), vec![0u8; 4]))
            .collect()
    }

    fn element(name: &str, image: &ImageResource, image_index: usize) -> TaggedElement {
        TaggedElement {
            id: TagId::new(),
            name: name.to_string(),
            image_index,
            image_id: image.id(),
            shape: RegionShape::rectangle(Bounds::new(0.0, 0.0, 10.0, 10.0)),
            cropped_image: CroppedImage::from_png_bytes(&[]),
        }
    }

    #[test]
    fn test_image_set_selection_is_bounds_checked() {
        let mut set = ImageSet::new(images(2));
        assert_eq!(set.current_index(), Some(0));
        set.select(1).unwrap();
        assert_eq!(set.current_index(), Some(1));

        let err = set.select(2).unwrap_err();
        assert!(matches!(
            err,
            TagError::ImageIndexOutOfRange { index: 2, len: 2 }
        ));
        assert_eq!(set.current_index(), Some(1));
    }

    #[test]
    fn test_empty_image_set_has_no_current() {
        let mut set = ImageSet::new(Vec::new());
        assert!(set.current().is_none());
        assert!(set.select(0).is_err());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let imgs = images(1);
        let mut store = TagStore::default();
        let e = element("Collar", &imgs[0], 0);
        store.add(e.clone()).unwrap();
        assert!(matches!(store.add(e), Err(TagError::DuplicateTag(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_is_exact() {
        let imgs = images(2);
        let mut store = TagStore::default();
        let a = element("Collar", &imgs[0], 0);
        let b = element("Badge", &imgs[0], 0);
        let c = element("Pocket", &imgs[1], 1);
        for e in [&a, &b, &c] {
            store.add(e.clone()).unwrap();
        }

        let removed = store.remove(b.id).unwrap();
        assert_eq!(removed, b);
        assert_eq!(store.all(), &[a.clone(), c.clone()]);
        assert!(matches!(store.remove(b.id), Err(TagError::TagNotFound(_))));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_elements_for_keeps_insertion_order() {
        let imgs = images(2);
        let mut store = TagStore::default();
        for (name, idx) in [("A", 0), ("B", 1), ("C", 0), ("D", 0)] {
            store.add(element(name, &imgs[idx], idx)).unwrap();
        }
        let names: Vec<_> = store.elements_for(0).map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "C", "D"]);
        assert_eq!(store.elements_for(1).count(), 1);
        assert_eq!(store.elements_for(5).count(), 0);
    }

    #[test]
    fn test_clear_image() {
        let imgs = images(2);
        let mut store = TagStore::default();
        for (name, idx) in [("A", 0), ("B", 1), ("C", 0)] {
            store.add(element(name, &imgs[idx], idx)).unwrap();
        }
        assert_eq!(store.clear_image(0), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].name, "B");
    }

    #[test]
    fn test_reindex_follows_stable_ids() {
        let imgs = images(3);
        let mut store = TagStore::default();
        store.add(element("A", &imgs[0], 0)).unwrap();
        store.add(element("B", &imgs[1], 1)).unwrap();
        store.add(element("C", &imgs[2], 2)).unwrap();

        // Image 1 removed, image 2 moved to the front
        let replaced = ImageSet::new(vec![imgs[2].clone(), imgs[0].clone()]);
        let orphaned = store.reindex(&replaced);

        assert_eq!(orphaned.len(), 1);
        assert_eq!(orphaned[0].name, "B");
        let positions: Vec<_> = store
            .all()
            .iter()
            .map(|e| (e.name.as_str(), e.image_index))
            .collect();
        assert_eq!(positions, [("A", 1), ("C", 0)]);
    }
}
