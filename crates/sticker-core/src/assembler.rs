use crate::layout::TextLine;
use crate::motion::Timeline;
use lottie_data::model::{AnimationDocument, Layer, Shape};
use tracing::debug;

pub const CAPTION_LAYER_NAME: &str = "Caption";

/// Inserts a shape layer holding `lines` in front of every other layer.
///
/// `layers[0]` is drawn on top, so the caption always covers the artwork.
/// Line groups keep the order they are given in. Existing layers are not
/// touched; the new layer takes the next free `ind` and spans `timeline`.
pub fn insert_caption_layer<'a>(
    doc: &'a mut AnimationDocument,
    lines: Vec<TextLine>,
    timeline: &Timeline,
) -> &'a Layer {
    let ind = doc
        .layers
        .iter()
        .filter_map(|layer| layer.ind)
        .max()
        .unwrap_or(0)
        + 1;

    let mut layer = Layer::shape_layer(CAPTION_LAYER_NAME, ind, timeline.ip, timeline.op);
    layer.shapes = Some(
        lines
            .into_iter()
            .map(|line| Shape::Group(line.group))
            .collect(),
    );

    debug!(ind, layers = doc.layers.len() + 1, "inserted caption layer");
    doc.layers.insert(0, layer);
    &doc.layers[0]
}
