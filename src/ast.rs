use crate::field::FieldArgument;

#[derive(Debug, Clone, PartialEq)]
pub struct Declarations {
    pub classes: Vec<Class>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    /// Identifier the descriptor is filed under.
    pub ident: String,
    pub model: Option<Model>,
    pub members: Vec<Member>,
}

/// Class-level annotation: `model "Name" [embedded]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub embedded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(Field),
    Seed(Seed),
}

/// `argument` is already decoded; object literals that fit no argument shape
/// are rejected by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub argument: FieldArgument,
}

/// Hand-written descriptor key: `@schema.<key> = <value>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Seed {
    Name(String),
    PrimaryKey(String),
    Embedded(bool),
    Asymmetric(bool),
}

impl Class {
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(f) => Some(f),
            Member::Seed(_) => None,
        })
    }

    pub fn seeds(&self) -> impl Iterator<Item = &Seed> {
        self.members.iter().filter_map(|m| match m {
            Member::Seed(s) => Some(s),
            Member::Field(_) => None,
        })
    }
}
