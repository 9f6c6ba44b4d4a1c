use kurbo::BezPath;
use libtest_mimic::{Arguments, Failed, Trial};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use sweepclip::{binary_op_paths, Contours};

const TOLERANCE: f64 = 1e-3;

#[derive(Serialize, Deserialize, Debug)]
enum BinaryOp {
    Union,
    Intersection,
    Difference,
    Xor,
}

#[derive(Serialize, Deserialize, Debug)]
enum Assertion {
    /// The operation succeeds (or fails gracefully) without panicking.
    NoPanic,
    /// The operation succeeds, and the output has this area.
    Area { area: f64, tolerance: f64 },
    /// The operation succeeds, and the output has this many outer rings and holes.
    Rings { outer: usize, holes: usize },
}

#[derive(Serialize, Deserialize, Debug)]
struct RegressionCaseDeclaration {
    svg_path_1: String,
    svg_path_2: String,
    op: BinaryOp,
    assert: Option<Assertion>,
}

impl RegressionCaseDeclaration {
    fn sweepclip_binary_op(&self) -> sweepclip::BinaryOp {
        match self.op {
            BinaryOp::Union => sweepclip::BinaryOp::Union,
            BinaryOp::Intersection => sweepclip::BinaryOp::Intersection,
            BinaryOp::Difference => sweepclip::BinaryOp::Difference,
            BinaryOp::Xor => sweepclip::BinaryOp::Xor,
        }
    }
}

fn main() {
    let _ = env_logger::builder().is_test(true).try_init();
    let args = Arguments::from_args();
    let tests = regression_tests();

    libtest_mimic::run(&args, tests).exit();
}

fn regression_tests() -> Vec<Trial> {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let file_paths = glob::glob(&format!("{ws}/tests/regression/**/*.yml")).unwrap();

    file_paths
        .into_iter()
        .map(|p| {
            let p = p.unwrap();
            let name = input_path_base(&p).display().to_string();
            Trial::test(name, || generate_regression_test(p))
        })
        .collect()
}

fn input_path_base(input_path: &Path) -> &Path {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let base = format!("{ws}/tests/regression");
    input_path.strip_prefix(base).unwrap()
}

fn generate_regression_test(path: PathBuf) -> Result<(), Failed> {
    let input = std::fs::read_to_string(&path).unwrap();
    let case: RegressionCaseDeclaration = serde_yaml::from_str(&input).unwrap();
    let p0 = BezPath::from_svg(case.svg_path_1.as_str()).unwrap();
    let p1 = BezPath::from_svg(case.svg_path_2.as_str()).unwrap();
    let result = binary_op_paths(&p0, &p1, case.sweepclip_binary_op(), TOLERANCE);

    match case.assert.unwrap_or(Assertion::NoPanic) {
        Assertion::NoPanic => Ok(()),
        Assertion::Area { area, tolerance } => {
            let contours = result?;
            check_closed(&contours)?;
            let actual = contours.area();
            if (actual - area).abs() > tolerance {
                return Err(format!("expected area {area}, got {actual}").into());
            }
            Ok(())
        }
        Assertion::Rings { outer, holes } => {
            let contours = result?;
            check_closed(&contours)?;
            let actual_holes = contours.contours().filter(|c| c.is_hole()).count();
            let actual_outer = contours.len() - actual_holes;
            if (actual_outer, actual_holes) != (outer, holes) {
                return Err(format!(
                    "expected {outer} outer rings and {holes} holes, \
                     got {actual_outer} and {actual_holes}"
                )
                .into());
            }
            Ok(())
        }
    }
}

fn check_closed(contours: &Contours) -> Result<(), Failed> {
    for (idx, contour) in contours.contours().enumerate() {
        if contour.points.len() < 4 || contour.points.first() != contour.points.last() {
            return Err(format!("contour {idx} isn't a closed ring: {:?}", contour.points).into());
        }
    }
    Ok(())
}
