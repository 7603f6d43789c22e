//! Reads a moveset where moves refer to animations declared further down.
//!
//! Each `[move]` is read through a scope lock so its subtree is handled on
//! its own, and the resolver binds moves to animations as they appear.
use info_markup::{Configuration, Event, InfoError, Reader, Resolver};
use miette::Report;
use std::cell::RefCell;

const MOVESET: &str = "\
[move punch 3]
\tanim jab
\tdamage 10
\t[hit high]
\t\tdamage +2
[move sweep 5]
\tanim low_kick
\tdamage 14
[anim jab]
\tframes (0 1 2 3)
\tduration 200ms
[anim low_kick]
\tframes (0 1 2 3 4 5)
\tduration 450ms
";

#[derive(Debug)]
struct Animation {
    name: String,
    frames: usize,
    duration: f64,
}

#[derive(Debug)]
struct Move {
    name: String,
    damage: i64,
    hits: Vec<(String, i64)>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:?}", Report::new(err));
        std::process::exit(1);
    }
}

fn run() -> Result<(), InfoError> {
    let mut config = Configuration::default();
    config.add_unit_scale("ms", 0.001);

    let mut moves = Vec::new();
    let bound = RefCell::new(Vec::new());
    let mut resolver = Resolver::new(|anim: &Animation, index: usize| {
        bound.borrow_mut().push((index, anim.name.clone()));
    });

    let mut reader = Reader::from_text(MOVESET, config);
    while reader.read_element()? {
        if reader.event() != Event::ElementStart {
            continue;
        }
        match reader.tag() {
            "move" => {
                let mv = read_move(&mut reader)?;
                let anim = reader.attribute_string("anim", "");
                if let Some(found) = resolver.link(&anim, moves.len()) {
                    bound.borrow_mut().push((moves.len(), found.name.clone()));
                }
                moves.push(mv);
            }
            "anim" => {
                let name = reader.parameter_string(0, "");
                reader.lock_scope();
                while reader.read()? {}
                let anim = Animation {
                    name: name.clone(),
                    frames: reader.attribute("frames").map_or(0, |value| value.count()),
                    duration: reader.attribute_float("duration", 0.0),
                };
                println!("{:?}", anim);
                resolver.resolve(&name, anim);
            }
            other => println!("skipping [{}]", other),
        }
    }

    for key in resolver.unresolved() {
        println!("animation '{}' was never declared", key);
    }
    drop(resolver);

    for (index, anim) in bound.into_inner() {
        println!("{:?} -> {}", moves[index], anim);
    }
    Ok(())
}

/// Reads one `[move]` subtree. The move's attributes stay visible until the
/// next read.
fn read_move<R: std::io::Read>(reader: &mut Reader<R>) -> Result<Move, InfoError> {
    let mut mv = Move {
        name: reader.parameter_string(0, ""),
        damage: 0,
        hits: Vec::new(),
    };
    reader.lock_scope();

    while reader.read()? {
        match reader.event() {
            Event::Attribute if reader.tag() == "move" && reader.key() == Some("damage") => {
                mv.damage = reader.value().integer(0);
            }
            Event::ElementStart if reader.tag() == "hit" => {
                mv.hits.push((
                    reader.parameter_string(0, ""),
                    reader.attribute_integer("damage", 0),
                ));
            }
            Event::Attribute if reader.tag() == "hit" && reader.key() == Some("damage") => {
                if let Some(hit) = mv.hits.last_mut() {
                    hit.1 = reader.value().integer(0);
                }
            }
            _ => {}
        }
    }
    Ok(mv)
}
