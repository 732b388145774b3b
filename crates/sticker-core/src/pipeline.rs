//! The overlay pipeline: decode, caption, normalize, compact, encode.

use crate::assembler::insert_caption_layer;
use crate::caption::Caption;
use crate::config::OverlayConfig;
use crate::errors::Result;
use crate::glyph::GlyphOutlineProvider;
use crate::layout::{place_line, style_line, LineRole, TextLine};
use crate::motion::{animate_letters, AnimationVariant, Timeline};
use crate::text::{RenderedText, TextShapeBuilder};
use lottie_core::{ensure_compliant, ensure_size, normalize, Codec};
use lottie_data::model::{AnimationDocument, GroupShape, Shape};
use rand::Rng;
use tracing::{debug, instrument};

/// Captions animated stickers with one font and one configuration.
///
/// Holds no per-request state; a single instance can serve any number of
/// overlay calls.
pub struct StickerOverlay<P: GlyphOutlineProvider> {
    provider: P,
    config: OverlayConfig,
}

impl<P: GlyphOutlineProvider> StickerOverlay<P> {
    pub fn new(provider: P, config: OverlayConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Captions a sticker and returns the new `.tgs` bytes.
    ///
    /// `input` is a gzip-compressed sticker or plain Lottie JSON. When `variant`
    /// is `None` one is picked from `rng`. Either a complete, compliant sticker is
    /// returned or nothing is.
    #[instrument(level = "info", skip(self, input, caption, rng), fields(bytes = input.len()))]
    pub fn overlay<R: Rng>(
        &self,
        input: &[u8],
        caption: &Caption,
        variant: Option<AnimationVariant>,
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        let mut doc = if Codec::is_gzip(input) {
            Codec::decode(input)?
        } else {
            Codec::decode_json(input)?
        };
        self.apply(&mut doc, caption, variant, rng)?;
        self.encode(&doc)
    }

    /// Adds the caption layer to `doc` and normalizes it.
    ///
    /// Motion is fitted to the timeline the document will have once normalized,
    /// so nothing moves past the capped out-point. Returns the
    /// variant actually used, which is [`AnimationVariant::Shake`] for timelines
    /// too short to spring.
    pub fn apply<R: Rng>(
        &self,
        doc: &mut AnimationDocument,
        caption: &Caption,
        variant: Option<AnimationVariant>,
        rng: &mut R,
    ) -> Result<AnimationVariant> {
        let timeline = Timeline::of(doc);
        let requested = variant.unwrap_or_else(|| AnimationVariant::random(rng));
        let variant = requested.for_timeline(&timeline, self.config.min_spring_seconds);
        if variant != requested {
            debug!(%requested, seconds = timeline.seconds(), "timeline too short, shaking instead");
        }

        let lines: Vec<TextLine> = caption
            .lines()
            .into_iter()
            .map(|(role, text)| self.build_line(text, role, variant, &timeline, rng))
            .collect();
        insert_caption_layer(doc, lines, &timeline);

        let report = normalize(doc);
        debug!(?report, "normalized");
        ensure_compliant(doc)?;
        Ok(variant)
    }

    /// Compacts and gzips `doc`, enforcing the configured size limit.
    pub fn encode(&self, doc: &AnimationDocument) -> Result<Vec<u8>> {
        let bytes = Codec::encode_compacted(doc, self.config.compact.into())?;
        if let Some(limit) = self.config.max_output_bytes {
            ensure_size(&bytes, limit)?;
        }
        Ok(bytes)
    }

    /// Renders a line no wider than the canvas allows.
    pub fn render_line(&self, text: &str) -> RenderedText {
        let builder = TextShapeBuilder::new(&self.provider);
        let rendered = builder.render(text, self.config.font_size, None);
        let available = self.config.fit_width();
        if rendered.width() <= available {
            return rendered;
        }
        let size = self.config.font_size * available / rendered.width();
        debug!(text, size, "shrinking line to fit the canvas");
        builder.render(text, size, None)
    }

    fn build_line<R: Rng>(
        &self,
        text: &str,
        role: LineRole,
        variant: AnimationVariant,
        timeline: &Timeline,
        rng: &mut R,
    ) -> TextLine {
        let rendered = self.render_line(text);
        let bounds = rendered.bounds;

        let mut letters: Vec<GroupShape> = rendered
            .group
            .items
            .into_iter()
            .map(|item| match item {
                Shape::Group(group) => group,
                other => {
                    let mut letter = GroupShape::new(None);
                    letter.push(other);
                    letter
                }
            })
            .collect();
        animate_letters(
            &mut letters,
            variant,
            timeline,
            text.chars().count(),
            self.config.canvas_size,
            self.config.shake,
            self.config.spring,
            rng,
        );

        let mut group = GroupShape::new(Some(text.to_string()));
        group.items = letters.into_iter().map(Shape::Group).collect();
        place_line(&mut group, role, bounds, variant, timeline, &self.config);
        style_line(&mut group, &self.config);

        TextLine {
            text: text.to_string(),
            role,
            group,
        }
    }
}
