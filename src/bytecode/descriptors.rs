//! Field and method descriptors
//!
//! Descriptors are the class-file notation for declared types (`I`, `[Ljava/lang/String;`,
//! `(IZ)V`, …). The analysis parses them at three places: method descriptors seed the entry
//! frame and size the parameter slots, field descriptors narrow the type-set a field access
//! consumes or pushes, and local-variable descriptors give lifetimes their declared type.

use crate::bytecode::types::{StackTypeSet, TypeTag};
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("descriptor ended unexpectedly")]
    UnexpectedEnd,
    #[error("unexpected character {0:?} in descriptor")]
    UnexpectedChar(char),
    #[error("unexpected leftover input {0:?} in descriptor")]
    LeftoverInput(char),
    #[error("array type exceeds 255 dimensions")]
    TooManyDimensions,
    #[error("method parameters exceed 255 slots")]
    TooManyParameterSlots,
}

/// Utility trait for converting descriptors to and from string representations
pub trait RenderDescriptor {
    /// Turn the descriptor into a string
    fn render(&self) -> String {
        let mut string = String::new();
        self.render_to(&mut string);
        string
    }

    /// Write the descriptor to a string
    fn render_to(&self, write_to: &mut String);
}

pub trait ParseDescriptor: Sized {
    /// Parse a descriptor from a string
    fn parse(source: &str) -> Result<Self, DescriptorError> {
        let mut chars = source.chars().peekable();
        let ret = Self::parse_from(&mut chars)?;
        match chars.next() {
            None => Ok(ret),
            Some(c) => Err(DescriptorError::LeftoverInput(c)),
        }
    }

    /// Read the descriptor from a character buffer
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, DescriptorError>;
}

/// Primitive value types
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub fn type_tag(self) -> TypeTag {
        match self {
            BaseType::Byte => TypeTag::Byte,
            BaseType::Char => TypeTag::Char,
            BaseType::Double => TypeTag::Double,
            BaseType::Float => TypeTag::Float,
            BaseType::Int => TypeTag::Int,
            BaseType::Long => TypeTag::Long,
            BaseType::Short => TypeTag::Short,
            BaseType::Boolean => TypeTag::Boolean,
        }
    }

    /// Local-variable slots occupied by a value of this type
    pub fn width(self) -> u16 {
        match self {
            BaseType::Double | BaseType::Long => 2,
            _ => 1,
        }
    }
}

impl RenderDescriptor for BaseType {
    fn render_to(&self, write_to: &mut String) {
        let c = match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        };
        write_to.push(c);
    }
}

impl ParseDescriptor for BaseType {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, DescriptorError> {
        let typ = match source.next() {
            Some('B') => BaseType::Byte,
            Some('C') => BaseType::Char,
            Some('D') => BaseType::Double,
            Some('F') => BaseType::Float,
            Some('I') => BaseType::Int,
            Some('J') => BaseType::Long,
            Some('S') => BaseType::Short,
            Some('Z') => BaseType::Boolean,
            Some(c) => return Err(DescriptorError::UnexpectedChar(c)),
            None => return Err(DescriptorError::UnexpectedEnd),
        };
        Ok(typ)
    }
}

/// Declared type of a field, parameter, return value or local variable
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum FieldType {
    Base(BaseType),
    /// Class or interface reference, by internal binary name (`java/lang/String`)
    Object(String),
    /// Array reference; `element` is never itself an `Array`
    Array {
        dimensions: u8,
        element: Box<FieldType>,
    },
}

impl FieldType {
    pub const fn int() -> FieldType {
        FieldType::Base(BaseType::Int)
    }

    pub const fn boolean() -> FieldType {
        FieldType::Base(BaseType::Boolean)
    }

    pub const fn long() -> FieldType {
        FieldType::Base(BaseType::Long)
    }

    pub const fn float() -> FieldType {
        FieldType::Base(BaseType::Float)
    }

    pub const fn double() -> FieldType {
        FieldType::Base(BaseType::Double)
    }

    pub fn object(class_name: impl Into<String>) -> FieldType {
        FieldType::Object(class_name.into())
    }

    /// Wrap a type in one more array dimension; class files cap dimensions at 255
    pub fn array(element: FieldType) -> Result<FieldType, DescriptorError> {
        match element {
            FieldType::Array {
                dimensions,
                element,
            } => Ok(FieldType::Array {
                dimensions: dimensions
                    .checked_add(1)
                    .ok_or(DescriptorError::TooManyDimensions)?,
                element,
            }),
            other => Ok(FieldType::Array {
                dimensions: 1,
                element: Box::new(other),
            }),
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            FieldType::Base(base) => base.type_tag(),
            FieldType::Object(_) | FieldType::Array { .. } => TypeTag::ObjectRef,
        }
    }

    /// The singleton type-set a value of this declared type occupies on the stack
    pub fn stack_type(&self) -> StackTypeSet {
        StackTypeSet::of(self.type_tag())
    }

    /// Local-variable slots occupied by a value of this type
    pub fn width(&self) -> u16 {
        match self {
            FieldType::Base(base) => base.width(),
            FieldType::Object(_) | FieldType::Array { .. } => 1,
        }
    }
}

impl RenderDescriptor for FieldType {
    fn render_to(&self, write_to: &mut String) {
        match self {
            FieldType::Base(base) => base.render_to(write_to),
            FieldType::Object(class_name) => {
                write_to.push('L');
                write_to.push_str(class_name);
                write_to.push(';');
            }
            FieldType::Array {
                dimensions,
                element,
            } => {
                for _ in 0..*dimensions {
                    write_to.push('[');
                }
                element.render_to(write_to);
            }
        }
    }
}

impl ParseDescriptor for FieldType {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, DescriptorError> {
        let mut dimensions: u8 = 0;
        while let Some('[') = source.peek() {
            source.next();
            dimensions = dimensions
                .checked_add(1)
                .ok_or(DescriptorError::TooManyDimensions)?;
        }

        let element = match source.peek() {
            Some('L') => {
                source.next();
                let mut class_name = String::new();
                loop {
                    match source.next() {
                        Some(';') => break,
                        Some(c) => class_name.push(c),
                        None => return Err(DescriptorError::UnexpectedEnd),
                    }
                }
                FieldType::Object(class_name)
            }
            Some(_) => FieldType::Base(BaseType::parse_from(source)?),
            None => return Err(DescriptorError::UnexpectedEnd),
        };

        if dimensions == 0 {
            Ok(element)
        } else {
            Ok(FieldType::Array {
                dimensions,
                element: Box::new(element),
            })
        }
    }
}

/// Declared parameter and return types of a method
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MethodDescriptor {
    pub parameters: Vec<FieldType>,
    pub return_type: Option<FieldType>,
}

impl MethodDescriptor {
    /// Local-variable slots the parameters occupy (excluding any receiver slot).
    /// Parsing caps this at 255, the class-file limit.
    pub fn parameter_slots(&self) -> u16 {
        self.parameters.iter().map(|param| param.width()).sum()
    }

    /// The type-set a return instruction leaves for the caller, `VOID` for void methods
    pub fn return_stack_type(&self) -> StackTypeSet {
        match &self.return_type {
            Some(typ) => typ.stack_type(),
            None => StackTypeSet::VOID,
        }
    }
}

impl RenderDescriptor for MethodDescriptor {
    fn render_to(&self, write_to: &mut String) {
        write_to.push('(');
        for parameter in &self.parameters {
            parameter.render_to(write_to);
        }
        write_to.push(')');
        match &self.return_type {
            Some(typ) => typ.render_to(write_to),
            None => write_to.push('V'),
        }
    }
}

impl ParseDescriptor for MethodDescriptor {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, DescriptorError> {
        match source.next() {
            Some('(') => (),
            Some(c) => return Err(DescriptorError::UnexpectedChar(c)),
            None => return Err(DescriptorError::UnexpectedEnd),
        }

        let mut parameters = vec![];
        let mut slots: u16 = 0;
        loop {
            match source.peek() {
                Some(')') => {
                    source.next();
                    break;
                }
                Some(_) => {
                    let parameter = FieldType::parse_from(source)?;
                    slots += parameter.width();
                    if slots > 255 {
                        return Err(DescriptorError::TooManyParameterSlots);
                    }
                    parameters.push(parameter);
                }
                None => return Err(DescriptorError::UnexpectedEnd),
            }
        }

        let return_type = match source.peek() {
            Some('V') => {
                source.next();
                None
            }
            Some(_) => Some(FieldType::parse_from(source)?),
            None => return Err(DescriptorError::UnexpectedEnd),
        };

        Ok(MethodDescriptor {
            parameters,
            return_type,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip<D: ParseDescriptor + RenderDescriptor>(source: &str) -> D {
        let parsed = D::parse(source).expect(source);
        assert_eq!(parsed.render(), source);
        parsed
    }

    #[test]
    fn base_types() {
        assert_eq!(round_trip::<FieldType>("I"), FieldType::int());
        assert_eq!(round_trip::<FieldType>("Z"), FieldType::boolean());
        assert_eq!(round_trip::<FieldType>("J"), FieldType::long());
        assert_eq!(FieldType::long().width(), 2);
        assert_eq!(FieldType::int().width(), 1);
    }

    #[test]
    fn object_types() {
        let string = round_trip::<FieldType>("Ljava/lang/String;");
        assert_eq!(string, FieldType::object("java/lang/String"));
        assert_eq!(string.type_tag(), TypeTag::ObjectRef);
        assert_eq!(string.stack_type(), StackTypeSet::REFERENCE);
    }

    #[test]
    fn array_types() {
        let ints = round_trip::<FieldType>("[I");
        assert_eq!(ints, FieldType::array(FieldType::int()).unwrap());
        assert_eq!(ints.width(), 1);

        let nested = round_trip::<FieldType>("[[Ljava/lang/Object;");
        assert_eq!(
            nested,
            FieldType::Array {
                dimensions: 2,
                element: Box::new(FieldType::object("java/lang/Object")),
            }
        );
        let nested_ints = FieldType::array(FieldType::array(FieldType::int()).unwrap()).unwrap();
        assert_eq!(nested_ints.render(), "[[I");
    }

    #[test]
    fn method_descriptors() {
        let descriptor = round_trip::<MethodDescriptor>("(IZLjava/lang/String;)V");
        assert_eq!(
            descriptor.parameters,
            vec![
                FieldType::int(),
                FieldType::boolean(),
                FieldType::object("java/lang/String"),
            ]
        );
        assert_eq!(descriptor.return_type, None);
        assert_eq!(descriptor.parameter_slots(), 3);
        assert_eq!(descriptor.return_stack_type(), StackTypeSet::VOID);

        let wide = round_trip::<MethodDescriptor>("(JD)J");
        assert_eq!(wide.parameter_slots(), 4);
        assert_eq!(wide.return_stack_type(), StackTypeSet::LONG);
    }

    #[test]
    fn rejects_malformed_descriptors() {
        assert!(FieldType::parse("").is_err());
        assert!(FieldType::parse("Q").is_err());
        assert!(FieldType::parse("Ljava/lang/String").is_err());
        assert!(FieldType::parse("II").is_err());
        assert!(MethodDescriptor::parse("(I").is_err());
        assert!(MethodDescriptor::parse("I)V").is_err());
        assert!(MethodDescriptor::parse("()").is_err());
    }

    #[test]
    fn caps_array_dimensions() {
        let deepest = "[".repeat(255) + "I";
        let parsed = FieldType::parse(&deepest).unwrap();
        assert_eq!(parsed.render(), deepest);
        assert_eq!(
            FieldType::array(parsed),
            Err(DescriptorError::TooManyDimensions)
        );

        let too_deep = "[".repeat(256) + "I";
        assert_eq!(
            FieldType::parse(&too_deep),
            Err(DescriptorError::TooManyDimensions)
        );
    }

    #[test]
    fn caps_parameter_slots() {
        let fullest = format!("({}I)V", "D".repeat(127));
        let parsed = MethodDescriptor::parse(&fullest).unwrap();
        assert_eq!(parsed.parameter_slots(), 255);

        let too_full = format!("({})V", "D".repeat(128));
        assert_eq!(
            MethodDescriptor::parse(&too_full),
            Err(DescriptorError::TooManyParameterSlots)
        );
    }
}
