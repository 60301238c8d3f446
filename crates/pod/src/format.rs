//! Format descriptors: an object frame carrying a media type/subtype pair
//! followed by a property bag describing the format itself (e.g. a video
//! format's rectangle, framerate and pixel layout). Used by `SET_FORMAT` and
//! the format-negotiation properties of `NODE_UPDATE`/`PORT_UPDATE`.

use bytes::Bytes;

use crate::builder::PodBuilder;
use crate::error::PodError;
use crate::props::Property;
use crate::types::PodType;
use crate::value::{PodObject, PodValue, decode_pod};

#[derive(Debug, Clone, PartialEq)]
pub struct FormatDescriptor {
    pub media_type: u32,
    pub media_subtype: u32,
    pub properties: Vec<Property>,
}

impl FormatDescriptor {
    pub fn new(media_type: u32, media_subtype: u32) -> Self {
        Self { media_type, media_subtype, properties: Vec::new() }
    }

    pub fn push(&mut self, property: Property) -> &mut Self {
        self.properties.push(property);
        self
    }

    pub fn build(&self) -> Bytes {
        let mut builder = PodBuilder::new();
        let obj = builder.push_object(self.media_type, self.media_subtype);
        for prop in &self.properties {
            let frame = builder.push_prop(prop.key, prop.flags, prop.value.pod_type(), prop.value.child_size());
            prop.value.write(&mut builder);
            for alt in &prop.alternatives {
                alt.write(&mut builder);
            }
            builder.pop(frame);
        }
        builder.pop(obj);
        builder.finish()
    }

    pub fn decode(data: &[u8]) -> Result<Self, PodError> {
        Self::decode_value(decode_pod(data)?)
    }

    /// Decodes a format descriptor from an already-parsed [`PodValue`], for
    /// callers that received it nested inside another compound value rather
    /// than as a standalone buffer.
    pub fn decode_value(value: PodValue<'_>) -> Result<Self, PodError> {
        let PodValue::Object(obj) = value else {
            return Err(PodError::TypeMismatch { expected: PodType::Object, found: value.type_tag() });
        };
        decode_object(obj)
    }
}

fn decode_object(obj: PodObject<'_>) -> Result<FormatDescriptor, PodError> {
    let mut properties = Vec::new();
    for field in obj.props() {
        let PodValue::Prop(prop) = field? else {
            return Err(PodError::TypeMismatch { expected: PodType::Prop, found: PodType::Invalid });
        };
        let value = crate::props::PropertyValue::from_pod(prop.default_value()?)?;
        let mut alternatives = Vec::new();
        for alt in prop.alternatives() {
            alternatives.push(crate::props::PropertyValue::from_pod(alt?)?);
        }
        properties.push(Property { key: prop.key, flags: prop.flags, value, alternatives });
    }
    Ok(FormatDescriptor { media_type: obj.id, media_subtype: obj.object_type, properties })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::PropertyValue;

    // Mirrors a minimal video format: rectangle, framerate, and a pixel
    // format id carried as a plain integer.
    #[test]
    fn video_format_round_trips() {
        let mut format = FormatDescriptor::new(1, 2);
        format.push(Property::new(1, 0, PropertyValue::Rectangle { width: 1920, height: 1080 }));
        format.push(Property::new(2, 0, PropertyValue::Fraction { num: 30, denom: 1 }));
        format.push(Property::new(3, 0, PropertyValue::Int(2)));
        let bytes = format.build();

        let decoded = FormatDescriptor::decode(&bytes).unwrap();
        assert_eq!(decoded.media_type, 1);
        assert_eq!(decoded.media_subtype, 2);
        assert_eq!(decoded.properties.len(), 3);
        assert!(matches!(
            decoded.properties[0].value,
            PropertyValue::Rectangle { width: 1920, height: 1080 }
        ));
        assert!(matches!(decoded.properties[1].value, PropertyValue::Fraction { num: 30, denom: 1 }));
        assert!(matches!(decoded.properties[2].value, PropertyValue::Int(2)));
    }
}
