use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as Json};

/// Keys a struct does not model, kept verbatim so re-serialization is lossless.
pub type Extra = Map<String, Json>;

pub type Vec2 = [f64; 2];

/// Root of a Lottie / TGS document.
///
/// Layer order follows the Lottie convention: `layers[0]` is drawn on top.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnimationDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<String>,
    pub fr: f64,
    pub ip: f64,
    pub op: f64,
    pub w: u32,
    pub h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddd: Option<u8>, // 3D Layer Flag (0=2D, 1=3D)
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl AnimationDocument {
    /// Timeline length in frames.
    pub fn duration_frames(&self) -> f64 {
        self.op - self.ip
    }

    /// Timeline length in seconds, zero when the frame rate is not positive.
    pub fn duration_seconds(&self) -> f64 {
        if self.fr > 0.0 {
            self.duration_frames() / self.fr
        } else {
            0.0
        }
    }

    pub fn is_3d(&self) -> bool {
        matches!(self.ddd, Some(flag) if flag != 0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Layer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddd: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ind: Option<i64>,
    pub ty: u8, // 0..5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ks: Option<Transform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ao: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shapes: Option<Vec<Shape>>, // Shape Layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub st: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bm: Option<u8>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Layer {
    pub const SHAPE: u8 = 4;

    /// An empty 2D shape layer spanning `[ip, op)`.
    pub fn shape_layer(name: impl Into<String>, ind: i64, ip: f64, op: f64) -> Self {
        Layer {
            ddd: Some(0),
            ind: Some(ind),
            ty: Self::SHAPE,
            nm: Some(name.into()),
            sr: Some(1.0),
            ks: Some(Transform::layer_default()),
            ao: Some(0),
            shapes: Some(Vec::new()),
            ip: Some(ip),
            op: Some(op),
            st: Some(0.0),
            bm: Some(0),
            extra: Extra::new(),
        }
    }
}

// Shapes

/// A shape item. Types the overlay engine builds are typed; every other item
/// (and any typed item that does not match the typed layout) is kept as raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Group(GroupShape),
    Path(PathShape),
    Fill(FillShape),
    Stroke(StrokeShape),
    Transform(Transform),
    Other(Json),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "ty")]
enum TaggedShape {
    #[serde(rename = "gr")]
    Group(GroupShape),
    #[serde(rename = "sh")]
    Path(PathShape),
    #[serde(rename = "fl")]
    Fill(FillShape),
    #[serde(rename = "st")]
    Stroke(StrokeShape),
    #[serde(rename = "tr")]
    Transform(Transform),
}

#[derive(Serialize)]
#[serde(tag = "ty")]
enum TaggedShapeRef<'a> {
    #[serde(rename = "gr")]
    Group(&'a GroupShape),
    #[serde(rename = "sh")]
    Path(&'a PathShape),
    #[serde(rename = "fl")]
    Fill(&'a FillShape),
    #[serde(rename = "st")]
    Stroke(&'a StrokeShape),
    #[serde(rename = "tr")]
    Transform(&'a Transform),
}

impl Serialize for Shape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Shape::Group(g) => TaggedShapeRef::Group(g).serialize(serializer),
            Shape::Path(p) => TaggedShapeRef::Path(p).serialize(serializer),
            Shape::Fill(f) => TaggedShapeRef::Fill(f).serialize(serializer),
            Shape::Stroke(s) => TaggedShapeRef::Stroke(s).serialize(serializer),
            Shape::Transform(t) => TaggedShapeRef::Transform(t).serialize(serializer),
            Shape::Other(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Json::deserialize(deserializer)?;

        let known = matches!(
            v.get("ty").and_then(Json::as_str),
            Some("gr" | "sh" | "fl" | "st" | "tr")
        );
        if !known {
            return Ok(Shape::Other(v));
        }

        // Fallback: keep the raw item if it does not fit the typed layout
        match serde_json::from_value::<TaggedShape>(v.clone()) {
            Ok(TaggedShape::Group(g)) => Ok(Shape::Group(g)),
            Ok(TaggedShape::Path(p)) => Ok(Shape::Path(p)),
            Ok(TaggedShape::Fill(f)) => Ok(Shape::Fill(f)),
            Ok(TaggedShape::Stroke(s)) => Ok(Shape::Stroke(s)),
            Ok(TaggedShape::Transform(t)) => Ok(Shape::Transform(t)),
            Err(_) => Ok(Shape::Other(v)),
        }
    }
}

/// A group of shapes. In JSON the transform is the trailing `"tr"` item of `"it"`;
/// here it is lifted into [`GroupShape::transform`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(from = "RawGroup", into = "RawGroup")]
pub struct GroupShape {
    pub nm: Option<String>,
    pub items: Vec<Shape>,
    pub transform: Option<Transform>,
    pub extra: Extra,
}

#[derive(Serialize, Deserialize)]
struct RawGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nm: Option<String>,
    #[serde(default)]
    it: Vec<Shape>,
    #[serde(flatten)]
    extra: Extra,
}

impl From<RawGroup> for GroupShape {
    fn from(raw: RawGroup) -> Self {
        let mut items = raw.it;
        let transform = match items.last() {
            Some(Shape::Transform(_)) => match items.pop() {
                Some(Shape::Transform(t)) => Some(t),
                _ => None,
            },
            _ => None,
        };
        GroupShape {
            nm: raw.nm,
            items,
            transform,
            extra: raw.extra,
        }
    }
}

impl From<GroupShape> for RawGroup {
    fn from(group: GroupShape) -> Self {
        let mut it = group.items;
        if let Some(t) = group.transform {
            it.push(Shape::Transform(t));
        }
        RawGroup {
            nm: group.nm,
            it,
            extra: group.extra,
        }
    }
}

impl GroupShape {
    /// An empty group with an identity transform.
    pub fn new(name: Option<String>) -> Self {
        GroupShape {
            nm: name,
            items: Vec::new(),
            transform: Some(Transform::identity()),
            extra: Extra::new(),
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.items.push(shape);
    }

    /// The group transform, created as identity when missing.
    pub fn transform_mut(&mut self) -> &mut Transform {
        self.transform.get_or_insert_with(Transform::identity)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PathShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    pub ks: Property,
    #[serde(flatten)]
    pub extra: Extra,
}

impl PathShape {
    pub fn new(path: BezierPath) -> Self {
        PathShape {
            nm: None,
            ks: Property::fixed(PropertyValue::Bezier(path)),
            extra: Extra::new(),
        }
    }

    pub fn bezier(&self) -> Option<&BezierPath> {
        match &self.ks.k {
            Some(PropertyValue::Bezier(path)) => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FillShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    pub c: Property,
    pub o: Property,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<u8>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl FillShape {
    /// Solid non-zero fill; `color` is RGBA in `0..=1`, fully opaque.
    pub fn solid(color: [f64; 4]) -> Self {
        FillShape {
            nm: None,
            c: Property::vector(color.to_vec()),
            o: Property::scalar(100.0),
            r: Some(1),
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StrokeShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    pub c: Property,
    pub o: Property,
    pub w: Property,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lc: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lj: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl StrokeShape {
    /// Round-capped, round-joined solid stroke.
    pub fn solid(color: [f64; 4], width: f64) -> Self {
        StrokeShape {
            nm: None,
            c: Property::vector(color.to_vec()),
            o: Property::scalar(100.0),
            w: Property::scalar(width),
            lc: Some(2),
            lj: Some(2),
            ml: None,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Transform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<Property>, // Anchor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<Property>, // Position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<Property>, // Scale (percent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<Property>, // Rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o: Option<Property>, // Opacity (percent)
    #[serde(flatten)]
    pub extra: Extra,
}

impl Transform {
    /// Identity transform for shape groups.
    pub fn identity() -> Self {
        Transform {
            a: Some(Property::vector(vec![0.0, 0.0])),
            p: Some(Property::vector(vec![0.0, 0.0])),
            s: Some(Property::vector(vec![100.0, 100.0])),
            r: Some(Property::scalar(0.0)),
            o: Some(Property::scalar(100.0)),
            extra: Extra::new(),
        }
    }

    /// Identity transform for layers, which carry 3-component vectors.
    pub fn layer_default() -> Self {
        Transform {
            a: Some(Property::vector(vec![0.0, 0.0, 0.0])),
            p: Some(Property::vector(vec![0.0, 0.0, 0.0])),
            s: Some(Property::vector(vec![100.0, 100.0, 100.0])),
            r: Some(Property::scalar(0.0)),
            o: Some(Property::scalar(100.0)),
            extra: Extra::new(),
        }
    }

    /// The position property, created as `[0, 0]` when missing.
    pub fn position_mut(&mut self) -> &mut Property {
        self.p.get_or_insert_with(|| Property::vector(vec![0.0, 0.0]))
    }
}

/// An animatable property: either a constant (`a = 0`) or a keyframe track (`a = 1`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Property {
    #[serde(default)]
    pub a: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<PropertyValue>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Property {
    pub fn fixed(value: PropertyValue) -> Self {
        Property {
            a: 0,
            k: Some(value),
            extra: Extra::new(),
        }
    }

    pub fn scalar(value: f64) -> Self {
        Self::fixed(PropertyValue::Scalar(value))
    }

    pub fn vector(value: Vec<f64>) -> Self {
        Self::fixed(PropertyValue::Vector(value))
    }

    pub fn track(keyframes: Vec<Keyframe>) -> Self {
        Property {
            a: 1,
            k: Some(PropertyValue::Animated(keyframes)),
            extra: Extra::new(),
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(&self.k, Some(PropertyValue::Animated(kfs)) if kfs.len() > 1)
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        match &self.k {
            Some(PropertyValue::Animated(kfs)) => kfs,
            _ => &[],
        }
    }

    /// Constant value as components, if the property is not animated.
    pub fn static_components(&self) -> Option<Vec<f64>> {
        match &self.k {
            Some(PropertyValue::Scalar(v)) => Some(vec![*v]),
            Some(PropertyValue::Vector(v)) => Some(v.clone()),
            Some(PropertyValue::Animated(kfs)) if kfs.len() == 1 => kfs[0].s.clone(),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(f64),
    Vector(Vec<f64>),
    Animated(Vec<Keyframe>),
    Bezier(BezierPath),
    Raw(Json),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Keyframe {
    pub t: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_components"
    )]
    pub s: Option<Vec<f64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_components"
    )]
    pub e: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i: Option<EasingHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o: Option<EasingHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<u8>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Keyframe {
    /// A keyframe easing linearly into the next one.
    pub fn linear(t: f64, value: Vec<f64>) -> Self {
        Keyframe {
            t,
            s: Some(value),
            i: Some(EasingHandle::new(1.0, 1.0)),
            o: Some(EasingHandle::new(0.0, 0.0)),
            ..Default::default()
        }
    }

    /// Closing keyframe of a track: a value without outgoing easing.
    pub fn last(t: f64, value: Vec<f64>) -> Self {
        Keyframe {
            t,
            s: Some(value),
            ..Default::default()
        }
    }

    pub fn is_hold(&self) -> bool {
        self.h == Some(1)
    }
}

// Keyframe values are usually arrays, but scalar properties are sometimes written bare.
fn deserialize_components<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Components {
        One(f64),
        Many(Vec<f64>),
    }

    Ok(match Option::<Components>::deserialize(deserializer)? {
        None => None,
        Some(Components::One(v)) => Some(vec![v]),
        Some(Components::Many(v)) => Some(v),
    })
}

/// Bezier easing handle of a keyframe (`{"x": [..], "y": [..]}`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EasingHandle {
    pub x: HandleAxis,
    pub y: HandleAxis,
}

impl EasingHandle {
    pub fn new(x: f64, y: f64) -> Self {
        EasingHandle {
            x: HandleAxis::Many(vec![x]),
            y: HandleAxis::Many(vec![y]),
        }
    }

    /// First-dimension handle as `[x, y]`.
    pub fn point(&self) -> Vec2 {
        [self.x.first(), self.y.first()]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum HandleAxis {
    One(f64),
    Many(Vec<f64>),
}

impl HandleAxis {
    pub fn first(&self) -> f64 {
        match self {
            HandleAxis::One(v) => *v,
            HandleAxis::Many(v) => v.first().copied().unwrap_or(0.0),
        }
    }
}

/// A bezier outline: vertices plus in/out tangents relative to each vertex.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct BezierPath {
    #[serde(default)]
    pub c: bool,
    pub i: Vec<Vec2>,
    pub o: Vec<Vec2>,
    pub v: Vec<Vec2>,
}

impl BezierPath {
    pub fn closed() -> Self {
        BezierPath {
            c: true,
            ..Default::default()
        }
    }

    pub fn push_vertex(&mut self, vertex: Vec2, in_tangent: Vec2, out_tangent: Vec2) {
        self.v.push(vertex);
        self.i.push(in_tangent);
        self.o.push(out_tangent);
    }

    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }
}
