//! Schema declaration files.
//!
//! A small line-oriented format:
//!
//! ```text
//! schema Social
//!
//! vertex Person
//!   id property id
//! vertex Company
//!
//! edge FRIENDS_WITH: many_to_many_symmetric(Person)
//! edge WORKS_AT: many_to_one(Person, Company)
//!
//! relationship Friendship on FRIENDS_WITH
//!   from param a
//!   to param b
//!   field property since
//! ```
//!
//! Member lines are `<role> <kind> <name>` with role `id | from | to | field`,
//! kind `param | property`, and `_` for an unnamed member. They belong to the
//! nearest preceding `vertex` or `relationship` line. `#` starts a comment.

use nom::{
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char as pchar, multispace0, multispace1},
    combinator::{all_consuming, opt, recognize},
    sequence::{preceded, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use stepgraph_steps::{EdgeDescriptor, EdgeName, EdgeVariant};

use crate::entity::{EntityDescriptor, MemberDecl, MemberKind, Role};
use crate::error::{FormatError, ParseError};

// ============================================================================
// AST
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDecl {
    pub name: Option<String>,
    pub vertices: Vec<EntityDescriptor>,
    pub edges: Vec<EdgeDescriptor>,
    pub relationships: Vec<EntityDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Vertex(usize),
    Relationship(usize),
}

// ============================================================================
// Parsing
// ============================================================================

pub fn parse_schema_decl(text: &str) -> Result<SchemaDecl, ParseError> {
    let mut decl = SchemaDecl::default();
    let mut block = Block::None;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        let fail = |message: String| ParseError::Line {
            line: line_no,
            message,
        };

        if let Some(rest) = line.strip_prefix("schema ") {
            if decl.name.is_some() {
                return Err(fail("schema name declared twice".to_string()));
            }
            decl.name = Some(parse_single_ident(rest, "schema <Name>").map_err(fail)?);
            block = Block::None;
            continue;
        }

        if let Some(rest) = line.strip_prefix("vertex ") {
            let name = parse_single_ident(rest, "vertex <Name>").map_err(fail)?;
            decl.vertices.push(EntityDescriptor::vertex(name));
            block = Block::Vertex(decl.vertices.len() - 1);
            continue;
        }

        if let Some(rest) = line.strip_prefix("edge ") {
            decl.edges.push(parse_edge_decl(rest).map_err(fail)?);
            block = Block::None;
            continue;
        }

        if let Some(rest) = line.strip_prefix("relationship ") {
            let (name, edge) = parse_relationship_header(rest).map_err(fail)?;
            decl.relationships.push(EntityDescriptor::relationship(name, edge));
            block = Block::Relationship(decl.relationships.len() - 1);
            continue;
        }

        let member = parse_member_decl(line).map_err(fail)?;
        let entity = match block {
            Block::Vertex(idx) => &mut decl.vertices[idx],
            Block::Relationship(idx) => &mut decl.relationships[idx],
            Block::None => {
                return Err(fail(
                    "member declaration outside of a `vertex` or `relationship` block".to_string(),
                ))
            }
        };
        entity.members.push(member);
    }

    Ok(decl)
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map(|(before, _)| before).unwrap_or(line)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse_ident(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        take_while1(is_ident_start),
        take_while(is_ident_continue),
    )))(input)
}

fn parse_single_ident(rest: &str, expected: &str) -> Result<String, String> {
    all_consuming(parse_ident)(rest.trim())
        .map(|(_, name)| name.to_string())
        .map_err(|_| format!("expected `{expected}`"))
}

fn parse_edge_decl(rest: &str) -> Result<EdgeDescriptor, String> {
    fn comma(input: &str) -> IResult<&str, ()> {
        let (input, _) = multispace0(input)?;
        let (input, _) = pchar(',')(input)?;
        let (input, _) = multispace0(input)?;
        Ok((input, ()))
    }

    fn parser(input: &str) -> IResult<&str, (&str, &str, &str, Option<&str>)> {
        let (input, name) = parse_ident(input)?;
        let (input, _) = multispace0(input)?;
        let (input, _) = pchar(':')(input)?;
        let (input, _) = multispace0(input)?;
        let (input, variant) = parse_ident(input)?;
        let (input, _) = multispace0(input)?;
        let (input, _) = pchar('(')(input)?;
        let (input, _) = multispace0(input)?;
        let (input, from) = parse_ident(input)?;
        let (input, to) = opt(preceded(comma, parse_ident))(input)?;
        let (input, _) = multispace0(input)?;
        let (input, _) = pchar(')')(input)?;
        Ok((input, (name, variant, from, to)))
    }

    let (_, (name, variant, from, to)) = all_consuming(parser)(rest.trim()).map_err(|_| {
        "edge expects: `edge <NAME>: <variant>(<From>, <To>)` \
         (or `<variant>(<Type>)` for symmetric edges)"
            .to_string()
    })?;

    let variant: EdgeVariant = variant.parse().map_err(|err| format!("{err}"))?;
    let to = match (to, variant.is_symmetric()) {
        (Some(to), _) => to,
        (None, true) => from,
        (None, false) => {
            return Err(format!(
                "`{variant}` edges need two vertex types: `{variant}(<From>, <To>)`"
            ))
        }
    };
    let name = EdgeName::new(name).map_err(|err| err.to_string())?;
    EdgeDescriptor::new(name, variant, from, to).map_err(|err| err.to_string())
}

fn parse_relationship_header(rest: &str) -> Result<(String, EdgeName), String> {
    fn parser(input: &str) -> IResult<&str, (&str, &str)> {
        let (input, name) = parse_ident(input)?;
        let (input, _) = multispace1(input)?;
        let (input, _) = tag("on")(input)?;
        let (input, _) = multispace1(input)?;
        let (input, edge) = parse_ident(input)?;
        Ok((input, (name, edge)))
    }

    let (_, (name, edge)) = all_consuming(parser)(rest.trim())
        .map_err(|_| "relationship expects: `relationship <Name> on <EDGE>`".to_string())?;
    let edge = EdgeName::new(edge).map_err(|err| err.to_string())?;
    Ok((name.to_string(), edge))
}

fn parse_member_decl(line: &str) -> Result<MemberDecl, String> {
    fn parser(input: &str) -> IResult<&str, (&str, &str, &str)> {
        let (input, role) = parse_ident(input)?;
        let (input, _) = multispace1(input)?;
        let (input, kind) = parse_ident(input)?;
        let (input, _) = multispace1(input)?;
        let (input, name) = parse_ident(input)?;
        Ok((input, (role, kind, name)))
    }

    let (_, (role, kind, name)) = all_consuming(parser)(line).map_err(|_| {
        format!("unrecognized line `{line}` (member lines are `<role> <param|property> <name>`)")
    })?;
    let role: Role = role.parse()?;
    let kind: MemberKind = kind.parse()?;
    Ok(MemberDecl {
        name: (name != "_").then(|| name.to_string()),
        kind,
        role,
    })
}

// ============================================================================
// Formatting
// ============================================================================

/// Canonical text for a declaration: schema name, vertices, edges, then
/// relationships, each member indented by two spaces.
///
/// Every name must be an identifier, and no member may be named `_`; other
/// declarations have no text form and are refused, so parsing the output
/// always yields `decl` back.
pub fn format_schema_decl(decl: &SchemaDecl) -> Result<String, FormatError> {
    check_writable(decl)?;

    let mut out = String::new();
    if let Some(name) = &decl.name {
        let _ = writeln!(out, "schema {name}");
    }

    section(&mut out, !decl.vertices.is_empty());
    for vertex in &decl.vertices {
        let _ = writeln!(out, "vertex {}", vertex.name);
        write_members(&mut out, &vertex.members);
    }

    section(&mut out, !decl.edges.is_empty());
    for edge in &decl.edges {
        let _ = writeln!(out, "edge {edge}");
    }

    section(&mut out, !decl.relationships.is_empty());
    for relationship in &decl.relationships {
        let edge = relationship.edge().map(EdgeName::as_str).unwrap_or_default();
        let _ = writeln!(out, "relationship {} on {edge}", relationship.name);
        write_members(&mut out, &relationship.members);
    }
    Ok(out)
}

fn check_writable(decl: &SchemaDecl) -> Result<(), FormatError> {
    if let Some(name) = &decl.name {
        identifier("schema", name)?;
    }
    for vertex in &decl.vertices {
        if !vertex.is_vertex() {
            return Err(FormatError::MisplacedEntity {
                entity: vertex.name.clone(),
                expected: "vertex",
            });
        }
        identifier("vertex", &vertex.name)?;
        writable_members(vertex)?;
    }
    for edge in &decl.edges {
        edge.validate()?;
        identifier("edge", edge.name.as_str())?;
        identifier("vertex", &edge.from)?;
        identifier("vertex", &edge.to)?;
    }
    for relationship in &decl.relationships {
        let edge = relationship
            .edge()
            .ok_or_else(|| FormatError::MisplacedEntity {
                entity: relationship.name.clone(),
                expected: "relationship",
            })?;
        identifier("relationship", &relationship.name)?;
        identifier("edge", edge.as_str())?;
        writable_members(relationship)?;
    }
    Ok(())
}

fn writable_members(entity: &EntityDescriptor) -> Result<(), FormatError> {
    for name in entity.members.iter().filter_map(|m| m.name.as_deref()) {
        if name == "_" {
            return Err(FormatError::ReservedMemberName {
                entity: entity.name.clone(),
            });
        }
        identifier("member", name)?;
    }
    Ok(())
}

fn identifier(what: &'static str, name: &str) -> Result<(), FormatError> {
    if all_consuming(parse_ident)(name).is_ok() {
        Ok(())
    } else {
        Err(FormatError::NotAnIdentifier {
            what,
            name: name.to_string(),
        })
    }
}

/// Blank line between non-empty sections.
fn section(out: &mut String, nonempty: bool) {
    if nonempty && !out.is_empty() {
        out.push('\n');
    }
}

fn write_members(out: &mut String, members: &[MemberDecl]) {
    for member in members {
        let name = member.name.as_deref().unwrap_or("_");
        let _ = writeln!(
            out,
            "  {} {} {name}",
            member.role.keyword(),
            member.kind.keyword()
        );
    }
}
