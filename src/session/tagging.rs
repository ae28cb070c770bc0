//! Tagging session: image selection, drawing, cropping and replay
//!
//! The session owns the authoritative tag list and repaints the display
//! surface from it after every change. Crops run asynchronously and come back
//! as a [`CropOutcome`]; each carries the session generation it was issued
//! under so a crop that resolves after an image switch or cancel is dropped.

use std::sync::Arc;

use crate::annotations::drawing::{DrawOutcome, ShapeDrawer};
use crate::config::{ShapeTool, TaggerConfig};
use crate::domain::{CroppedImage, Point, RegionShape, Size, TagId, TaggedElement};
use crate::error::{Result, TagError};
use crate::photo::{ImageId, ImageResource, SourceImage};
use crate::render::canvas::{Canvas, RenderStyle};
use crate::render::crop::crop_region_async;

use super::state::{ImageSet, TagStore};

/// Called with the full tag list and image set after every tag mutation
pub type TagsListener = Box<dyn FnMut(&[TaggedElement], &[ImageResource]) + Send>;

/// Identifies the context a crop was requested in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropTicket {
    generation: u64,
    image_index: usize,
    image_id: ImageId,
}

/// A named shape ready to be cropped off the session
pub struct CropJob {
    ticket: CropTicket,
    name: String,
    shape: RegionShape,
    resource: ImageResource,
    decoded: Option<Arc<SourceImage>>,
    display: Size,
}

impl CropJob {
    pub fn ticket(&self) -> CropTicket {
        self.ticket
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &RegionShape {
        &self.shape
    }

    /// Decode the source if needed and crop the shape out of it
    pub async fn run(self) -> CropOutcome {
        let result = match self.decoded {
            Some(image) => crop_region_async(image, self.shape.clone(), self.display).await,
            None => match self.resource.decode().await {
                Ok(image) => {
                    crop_region_async(Arc::new(image), self.shape.clone(), self.display).await
                }
                Err(err) => Err(err),
            },
        };
        CropOutcome {
            ticket: self.ticket,
            name: self.name,
            shape: self.shape,
            result,
        }
    }
}

/// A resolved crop, to be handed back to [`TaggingSession::finish_crop`]
pub struct CropOutcome {
    ticket: CropTicket,
    name: String,
    shape: RegionShape,
    result: anyhow::Result<CroppedImage>,
}

impl CropOutcome {
    pub fn ticket(&self) -> CropTicket {
        self.ticket
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct TaggingSession {
    config: TaggerConfig,
    style: RenderStyle,
    images: ImageSet,
    decoded: Vec<Option<Arc<SourceImage>>>,
    tags: TagStore,
    drawer: ShapeDrawer,
    canvas: Canvas,
    generation: u64,
    listener: Option<TagsListener>,
}

impl TaggingSession {
    /// Start a session on `images`, showing the first one
    pub async fn new(images: Vec<ImageResource>, config: TaggerConfig) -> Result<Self> {
        let canvas = Canvas::new(config.display_size()).map_err(TagError::Surface)?;
        let decoded = vec![None; images.len()];
        let mut session = Self {
            style: RenderStyle::from_config(&config),
            drawer: ShapeDrawer::new(config.default_tool, config.min_shape_size),
            images: ImageSet::new(images),
            decoded,
            tags: TagStore::default(),
            canvas,
            generation: 0,
            listener: None,
            config,
        };
        session.show_current().await;
        Ok(session)
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    pub fn images(&self) -> &[ImageResource] {
        self.images.images()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.images.current_index()
    }

    /// Decoded form of the active image, `None` if it failed to decode
    pub fn active_image(&self) -> Option<&SourceImage> {
        let index = self.images.current_index()?;
        self.decoded.get(index)?.as_deref()
    }

    /// Every committed tag, all images
    pub fn tags(&self) -> &[TaggedElement] {
        self.tags.all()
    }

    /// Committed tags of the active image
    pub fn active_tags(&self) -> Vec<&TaggedElement> {
        match self.images.current_index() {
            Some(index) => self.tags.elements_for(index).collect(),
            None => Vec::new(),
        }
    }

    pub fn drawer(&self) -> &ShapeDrawer {
        &self.drawer
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Register the tags-changed listener, replacing any previous one
    pub fn on_tags_changed(
        &mut self,
        listener: impl FnMut(&[TaggedElement], &[ImageResource]) + Send + 'static,
    ) {
        self.listener = Some(Box::new(listener));
    }

    pub fn set_tool(&mut self, tool: ShapeTool) {
        let outcome = self.drawer.set_tool(tool);
        self.after_draw(outcome);
    }

    pub fn cycle_tool(&mut self) {
        self.set_tool(self.drawer.tool().next());
    }

    pub fn pointer_down(&mut self, p: Point) -> DrawOutcome {
        if self.images.current().is_none() {
            return DrawOutcome::Ignored;
        }
        let p = self.on_surface(p);
        let outcome = self.drawer.pointer_down(p);
        self.after_draw(outcome)
    }

    pub fn pointer_move(&mut self, p: Point) -> DrawOutcome {
        let p = self.on_surface(p);
        let outcome = self.drawer.pointer_move(p);
        self.after_draw(outcome)
    }

    pub fn pointer_up(&mut self, p: Point) -> DrawOutcome {
        let p = self.on_surface(p);
        let outcome = self.drawer.pointer_up(p);
        self.after_draw(outcome)
    }

    /// Close a traced polyline
    pub fn finish_shape(&mut self) -> DrawOutcome {
        let outcome = self.drawer.finish();
        self.after_draw(outcome)
    }

    /// Drop the draft, including one whose crop is still running
    pub fn cancel(&mut self) -> DrawOutcome {
        self.generation += 1;
        let outcome = self.drawer.cancel();
        self.after_draw(outcome)
    }

    /// Whether a commit with `name` would be accepted right now
    pub fn can_confirm(&self, name: &str) -> bool {
        self.drawer.can_confirm(name)
    }

    /// Name the pending shape and hand out the crop to run
    pub fn confirm_name(&mut self, name: &str) -> Result<CropJob> {
        let index = self.images.current_index().ok_or(TagError::NoActiveImage)?;
        let resource = self
            .images
            .get(index)
            .cloned()
            .ok_or(TagError::NoActiveImage)?;
        let (shape, name) = self.drawer.begin_crop(name)?;

        log::debug!("Cropping {:?} for tag {name:?}", shape.tool());
        Ok(CropJob {
            ticket: CropTicket {
                generation: self.generation,
                image_index: index,
                image_id: resource.id(),
            },
            name,
            shape,
            decoded: self.decoded.get(index).cloned().flatten(),
            resource,
            display: self.config.display_size(),
        })
    }

    /// Apply a resolved crop
    ///
    /// Returns the new tag id, or `None` if the crop was stale and dropped.
    pub fn finish_crop(&mut self, outcome: CropOutcome) -> Result<Option<TagId>> {
        if !self.is_current(outcome.ticket) {
            log::debug!("Dropping stale crop for tag {:?}", outcome.name);
            return Ok(None);
        }
        self.drawer.crop_resolved();

        let cropped_image = match outcome.result {
            Ok(crop) => crop,
            Err(err) => {
                log::warn!("Crop for tag {:?} failed: {err:#}", outcome.name);
                self.repaint();
                return Err(TagError::Crop(err));
            }
        };

        let element = TaggedElement {
            id: TagId::new(),
            name: outcome.name,
            image_index: outcome.ticket.image_index,
            image_id: outcome.ticket.image_id,
            shape: outcome.shape,
            cropped_image,
        };
        let id = element.id;
        log::info!(
            "Tagged {:?} on image {} as {id}",
            element.name,
            element.image_index
        );
        self.tags.add(element)?;
        self.notify();
        self.repaint();
        Ok(Some(id))
    }

    /// Name the pending shape, crop it and commit the tag
    pub async fn commit(&mut self, name: &str) -> Result<Option<TagId>> {
        let job = self.confirm_name(name)?;
        let outcome = job.run().await;
        self.finish_crop(outcome)
    }

    /// Switch the active image; any draft is dropped
    pub async fn select_image(&mut self, index: usize) -> Result<()> {
        self.images.select(index)?;
        self.generation += 1;
        self.drawer.reset();
        self.show_current().await;
        Ok(())
    }

    /// Delete one tag
    pub fn remove_tag(&mut self, id: TagId) -> Result<TaggedElement> {
        let removed = self.tags.remove(id)?;
        log::info!("Removed tag {:?} ({id})", removed.name);
        self.notify();
        self.repaint();
        Ok(removed)
    }

    /// Delete every tag on one image
    pub fn clear_image_tags(&mut self, index: usize) -> Result<usize> {
        if index >= self.images.len() {
            return Err(TagError::ImageIndexOutOfRange {
                index,
                len: self.images.len(),
            });
        }
        let removed = self.tags.clear_image(index);
        if removed > 0 {
            log::info!("Removed {removed} tags from image {index}");
            self.notify();
            self.repaint();
        }
        Ok(removed)
    }

    /// Take over a new image set from the upload step
    ///
    /// Tags follow their image by stable id; tags whose image is gone are
    /// dropped. The previously active image stays active if it survived.
    pub async fn replace_images(&mut self, images: Vec<ImageResource>) -> Result<()> {
        let previous = self.images.current().map(ImageResource::id);
        let old_decoded: Vec<_> = self
            .images
            .images()
            .iter()
            .map(ImageResource::id)
            .zip(self.decoded.drain(..))
            .collect();

        let mut set = ImageSet::new(images);
        if let Some(index) = previous.and_then(|id| set.position(id)) {
            set.select(index)?;
        }
        self.decoded = set
            .images()
            .iter()
            .map(|img| {
                old_decoded
                    .iter()
                    .find(|(id, _)| *id == img.id())
                    .and_then(|(_, d)| d.clone())
            })
            .collect();
        self.images = set;

        for orphan in self.tags.reindex(&self.images) {
            log::warn!(
                "Dropping tag {:?}: its image is no longer loaded",
                orphan.name
            );
        }

        self.generation += 1;
        self.drawer.reset();
        self.notify();
        self.show_current().await;
        Ok(())
    }

    /// Pointer positions past the display edge are pinned to it
    fn on_surface(&self, p: Point) -> Point {
        p.clamp_to(self.canvas.size())
    }

    fn is_current(&self, ticket: CropTicket) -> bool {
        ticket.generation == self.generation
            && self.images.current_index() == Some(ticket.image_index)
            && self.images.current().map(ImageResource::id) == Some(ticket.image_id)
    }

    fn after_draw(&mut self, outcome: DrawOutcome) -> DrawOutcome {
        if outcome.needs_repaint() {
            self.repaint();
        }
        outcome
    }

    /// Decode the active image if needed, then repaint
    async fn show_current(&mut self) {
        if let Some(index) = self.images.current_index()
            && self.decoded.get(index).is_some_and(Option::is_none)
            && let Some(resource) = self.images.get(index)
        {
            match resource.decode().await {
                Ok(image) => self.decoded[index] = Some(Arc::new(image)),
                Err(err) => log::warn!("Leaving image {index} unpainted: {err:#}"),
            }
        }
        self.repaint();
    }

    /// Replay the active image, its tags and the draft preview
    fn repaint(&mut self) {
        let Some(index) = self.images.current_index() else {
            self.canvas
                .render(None, std::iter::empty(), None, &self.style);
            return;
        };
        let base = self.decoded.get(index).and_then(|d| d.as_deref());
        let preview = self.drawer.preview();
        let shapes = self.tags.elements_for(index).map(|e| &e.shape);
        self.canvas.render(base, shapes, preview.as_ref(), &self.style);
    }

    fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener(self.tags.all(), self.images.images());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bounds;
    use std::sync::Mutex;

    fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(color));
        let mut out = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    fn photos(n: usize) -> Vec<ImageResource> {
        (0..n)
            .map(|i| {
                ImageResource::new(
                    format!("uniform-{i}.png"),
                    png(576, 800, [40 * i as u8, 120, 200, 255]),
                )
            })
            .collect()
    }

    fn drag(session: &mut TaggingSession, from: (f32, f32), to: (f32, f32)) -> DrawOutcome {
        session.pointer_down(Point::new(from.0, from.1));
        session.pointer_move(Point::new(to.0, to.1));
        session.pointer_up(Point::new(to.0, to.1))
    }

    #[tokio::test]
    async fn test_commit_adds_tag_after_crop() {
        let mut session = TaggingSession::new(photos(1), TaggerConfig::default())
            .await
            .unwrap();
        assert_eq!(drag(&mut session, (10.0, 10.0), (60.0, 40.0)), DrawOutcome::NeedsName);

        let job = session.confirm_name("Badge").unwrap();
        // Not visible until the crop resolves
        assert!(session.tags().is_empty());

        let outcome = job.run().await;
        let id = session.finish_crop(outcome).unwrap().unwrap();
        let tag = &session.tags()[0];
        assert_eq!(tag.id, id);
        assert_eq!(tag.name, "Badge");
        assert_eq!(tag.shape, RegionShape::rectangle(Bounds::new(10.0, 10.0, 50.0, 30.0)));
        assert_eq!(tag.cropped_image.decode().unwrap().dimensions(), (50, 30));
        assert!(session.drawer().is_idle());
    }

    #[tokio::test]
    async fn test_release_past_display_edge_is_pinned() {
        let mut session = TaggingSession::new(photos(1), TaggerConfig::default())
            .await
            .unwrap();
        assert_eq!(
            drag(&mut session, (10.0, 10.0), (200000.0, 200000.0)),
            DrawOutcome::NeedsName
        );

        let id = session.commit("Huge").await.unwrap().unwrap();
        let tag = &session.tags()[0];
        assert_eq!(tag.id, id);
        assert_eq!(tag.shape, RegionShape::rectangle(Bounds::new(10.0, 10.0, 278.0, 390.0)));
        assert_eq!(tag.cropped_image.decode().unwrap().dimensions(), (278, 390));
    }

    #[tokio::test]
    async fn test_crop_resolving_after_image_switch_is_dropped() {
        let mut session = TaggingSession::new(photos(2), TaggerConfig::default())
            .await
            .unwrap();
        drag(&mut session, (10.0, 10.0), (60.0, 60.0));
        let job = session.confirm_name("Collar").unwrap();

        session.select_image(1).await.unwrap();
        let outcome = job.run().await;
        assert!(outcome.is_ok());
        assert_eq!(session.finish_crop(outcome).unwrap(), None);
        assert!(session.tags().is_empty());

        // Switching back does not resurrect it either
        session.select_image(0).await.unwrap();
        assert!(session.active_tags().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_while_cropping_drops_result() {
        let mut session = TaggingSession::new(photos(1), TaggerConfig::default())
            .await
            .unwrap();
        drag(&mut session, (10.0, 10.0), (60.0, 60.0));
        let job = session.confirm_name("Pocket").unwrap();
        assert_eq!(session.cancel(), DrawOutcome::Discarded);

        let outcome = job.run().await;
        assert_eq!(session.finish_crop(outcome).unwrap(), None);
        assert!(session.tags().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_image_fails_crop_without_touching_store() {
        let mut images = photos(1);
        images.push(ImageResource::new("corrupt.png", vec![0u8; 16]));
        let mut session = TaggingSession::new(images, TaggerConfig::default())
            .await
            .unwrap();

        drag(&mut session, (10.0, 10.0), (60.0, 60.0));
        session.commit("Sleeve").await.unwrap();
        assert_eq!(session.tags().len(), 1);

        session.select_image(1).await.unwrap();
        assert!(session.active_image().is_none());
        assert!(session.canvas().pixmap().data().iter().all(|&b| b == 0));

        drag(&mut session, (10.0, 10.0), (60.0, 60.0));
        let err = session.commit("Hem").await.unwrap_err();
        assert!(matches!(err, TagError::Crop(_)));
        assert_eq!(session.tags().len(), 1);
        assert!(session.drawer().is_idle());

        // The good image still shows its tag
        session.select_image(0).await.unwrap();
        assert_eq!(session.active_tags().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_name_blocks_commit() {
        let mut session = TaggingSession::new(photos(1), TaggerConfig::default())
            .await
            .unwrap();
        drag(&mut session, (10.0, 10.0), (60.0, 60.0));
        assert!(!session.can_confirm(" "));
        assert!(matches!(
            session.commit("   ").await,
            Err(TagError::EmptyName)
        ));
        assert!(session.can_confirm("Logo"));
        assert!(session.commit("Logo").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_listener_sees_every_mutation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut session = TaggingSession::new(photos(2), TaggerConfig::default())
            .await
            .unwrap();
        let sink = Arc::clone(&seen);
        session.on_tags_changed(move |tags, images| {
            sink.lock().unwrap().push((tags.len(), images.len()));
        });

        drag(&mut session, (10.0, 10.0), (60.0, 60.0));
        let id = session.commit("Collar").await.unwrap().unwrap();
        drag(&mut session, (100.0, 100.0), (160.0, 160.0));
        session.commit("Badge").await.unwrap();
        session.remove_tag(id).unwrap();

        assert_eq!(*seen.lock().unwrap(), [(1, 2), (2, 2), (1, 2)]);
    }

    #[tokio::test]
    async fn test_select_out_of_range_keeps_state() {
        let mut session = TaggingSession::new(photos(2), TaggerConfig::default())
            .await
            .unwrap();
        session.pointer_down(Point::new(5.0, 5.0));
        let err = session.select_image(7).await.unwrap_err();
        assert!(matches!(err, TagError::ImageIndexOutOfRange { index: 7, len: 2 }));
        assert_eq!(session.active_index(), Some(0));
        assert!(!session.drawer().is_idle());
    }

    #[tokio::test]
    async fn test_session_without_images_ignores_input() {
        let mut session = TaggingSession::new(Vec::new(), TaggerConfig::default())
            .await
            .unwrap();
        assert_eq!(session.pointer_down(Point::new(5.0, 5.0)), DrawOutcome::Ignored);
        assert!(matches!(session.confirm_name("X"), Err(TagError::NoActiveImage)));
    }

    #[tokio::test]
    async fn test_replace_images_follows_stable_ids() {
        let originals = photos(3);
        let mut session = TaggingSession::new(originals.clone(), TaggerConfig::default())
            .await
            .unwrap();
        for index in 0..3 {
            session.select_image(index).await.unwrap();
            drag(&mut session, (10.0, 10.0), (60.0, 60.0));
            session.commit(&format!("Tag {index}")).await.unwrap();
        }

        // Active image is 2; drop image 1 and reverse the rest
        session
            .replace_images(vec![originals[2].clone(), originals[0].clone()])
            .await
            .unwrap();

        assert_eq!(session.active_index(), Some(0));
        assert!(session.active_image().is_some());
        let mut tags: Vec<_> = session
            .tags()
            .iter()
            .map(|t| (t.name.as_str(), t.image_index))
            .collect();
        tags.sort();
        assert_eq!(tags, [("Tag 0", 1), ("Tag 2", 0)]);
        assert_eq!(session.active_tags()[0].name, "Tag 2");
    }
}
