use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser};
use kurbo::BezPath;
use svg::Document;

use sweepclip::{binary_op, generators, BinaryOp, Contours, Point};

type Rings = Vec<Vec<Point>>;

#[derive(Copy, Clone, Debug)]
enum Op {
    Union,
    Intersection,
    Xor,
    Difference,
    ReverseDifference,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Example {
    Checkerboard,
    SlantedCheckerboard,
    Slanties,
}

#[derive(Parser)]
struct Cli {
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    input: Input,

    /// How closely curves in the input get approximated by lines.
    #[arg(long)]
    tolerance: Option<f64>,

    /// The size of the generated examples.
    #[arg(long, default_value_t = 10)]
    size: usize,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    /// A text file with two lines, each containing SVG path data.
    input: Option<PathBuf>,

    #[arg(long)]
    example: Option<Example>,
}

fn path_to_rings(path: &BezPath, tolerance: f64) -> Rings {
    let mut rings = Vec::new();
    let mut ring: Vec<Point> = Vec::new();
    let mut finish = |ring: &mut Vec<Point>| {
        if let Some(&first) = ring.first() {
            if ring.last() != Some(&first) {
                ring.push(first);
            }
            rings.push(std::mem::take(ring));
        }
    };
    kurbo::flatten(path.iter(), tolerance, |el| match el {
        kurbo::PathEl::MoveTo(p) => {
            finish(&mut ring);
            ring.push(p.into());
        }
        kurbo::PathEl::LineTo(p) => ring.push(p.into()),
        _ => {}
    });
    finish(&mut ring);
    rings.retain(|r| r.len() >= 4);
    rings
}

fn get_rings(args: &Cli) -> anyhow::Result<(Rings, Rings)> {
    let input = &args.input;
    match (&input.input, &input.example) {
        (Some(path), None) => {
            let input = std::fs::read_to_string(path)?;
            let mut lines = input.lines().filter(|l| !l.trim().is_empty());
            let tolerance = args.tolerance.unwrap_or(0.1);
            let mut next_path = || -> anyhow::Result<Rings> {
                let line = lines.next().context("expected two paths")?;
                Ok(path_to_rings(&BezPath::from_svg(line)?, tolerance))
            };
            let a = next_path()?;
            let b = next_path()?;
            Ok((a, b))
        }
        (None, Some(example)) => Ok(match example {
            Example::Checkerboard => generators::checkerboard(args.size),
            Example::SlantedCheckerboard => generators::slanted_checkerboard(args.size),
            Example::Slanties => generators::slanties(args.size),
        }),
        _ => unreachable!(),
    }
}

pub fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();
    let (shape_a, shape_b) = get_rings(&args)?;

    let mut rings = shape_a.clone();
    rings.extend(shape_b.iter().cloned());
    let bbox = rings
        .iter()
        .flatten()
        .map(|p| p.to_kurbo())
        .fold(None, |acc: Option<kurbo::Rect>, p| {
            Some(acc.map_or(kurbo::Rect::from_points(p, p), |r| r.union_pt(p)))
        })
        .context("empty input")?;

    let pad = 1.0;
    let one_width = bbox.width() + 2.0 * pad;
    let one_height = bbox.height() + 2.0 * pad;
    let stroke_width = bbox.width().max(bbox.height()) / 512.0;
    let mut document = svg::Document::new().set(
        "viewBox",
        (
            bbox.x0 - pad,
            bbox.y0 - pad,
            one_width * 3.0,
            one_height * 2.0,
        ),
    );

    // Draw the inputs, faintly.
    for c in rings {
        let Some((p, rest)) = c.split_first() else {
            continue;
        };
        let mut data = svg::node::element::path::Data::new();
        data = data.move_to((p.x, p.y));

        for p in rest {
            data = data.line_to((p.x, p.y));
        }

        let path = svg::node::element::Path::new()
            .set("stroke", "black")
            .set("stroke-width", stroke_width)
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round")
            .set("opacity", 0.2)
            .set("fill", "none")
            .set("d", data);
        document = document.add(path);
    }

    let panels = [
        (Op::Union, one_width, 0.0),
        (Op::Intersection, one_width * 2.0, 0.0),
        (Op::Xor, 0.0, one_height),
        (Op::Difference, one_width, one_height),
        (Op::ReverseDifference, one_width * 2.0, one_height),
    ];
    for (op, x_off, y_off) in panels {
        let contours = match op {
            Op::Union => binary_op(shape_a.clone(), shape_b.clone(), BinaryOp::Union),
            Op::Intersection => binary_op(shape_a.clone(), shape_b.clone(), BinaryOp::Intersection),
            Op::Xor => binary_op(shape_a.clone(), shape_b.clone(), BinaryOp::Xor),
            Op::Difference => binary_op(shape_a.clone(), shape_b.clone(), BinaryOp::Difference),
            Op::ReverseDifference => {
                binary_op(shape_b.clone(), shape_a.clone(), BinaryOp::Difference)
            }
        }
        .with_context(|| format!("computing {op:?}"))?;
        log::info!("{op:?}: {} contours, area {}", contours.len(), contours.area());
        document = add_op(document, &contours, x_off, y_off, stroke_width);
    }

    svg::save(&args.output, &document)?;

    Ok(())
}

fn add_op(
    mut doc: Document,
    contours: &Contours,
    x_off: f64,
    y_off: f64,
    stroke_width: f64,
) -> Document {
    let colors = [
        "#005F73", "#0A9396", "#94D2BD", "#E9D8A6", "#EE9B00", "#CA6702", "#BB3E03", "#AE2012",
        "#9B2226",
    ];

    let mut color_idx = 0;
    for polygon in contours.polygons() {
        let mut data = svg::node::element::path::Data::new();

        for ring in std::iter::once(&polygon.outer).chain(&polygon.holes) {
            let mut ring = ring.iter();
            let Some(p) = ring.next() else {
                continue;
            };

            data = data.move_to((p.x + x_off, p.y + y_off));
            for p in ring {
                data = data.line_to((p.x + x_off, p.y + y_off));
            }
            data = data.close();
        }
        let path = svg::node::element::Path::new()
            .set("d", data)
            .set("stroke", "black")
            .set("stroke-width", stroke_width)
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round")
            .set("fill-rule", "evenodd")
            .set("fill", colors[color_idx]);
        doc = doc.add(path);
        color_idx = (color_idx + 1) % colors.len();
    }
    doc
}
