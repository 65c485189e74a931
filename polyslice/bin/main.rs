use std::{
    fs::{self, File},
    io::BufWriter,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

use args::{Args, Operation};
use polyslice::{
    boolean, infill,
    format::{
        json::{Input, Shapes},
        svg::SvgFile,
        Format,
    },
    geometry::Geometry,
};

mod args;

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = filter::Targets::new()
        .with_default(LevelFilter::WARN)
        .with_target("polyslice", args.log_level());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = args
        .output_format()
        .context("Can't guess the output format, pass --format")?;

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read `{}`", args.input.display()))?;
    let input = serde_json::from_str::<Input>(&raw).context("Invalid input file")?;

    let now = Instant::now();
    let result = run(&args, &input);
    info!(
        "Ran {:?} in {:.1}ms",
        args.operation,
        now.elapsed().as_secs_f64() * 1000.0
    );

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create `{}`", args.output.display()))?;
    let writer = BufWriter::new(file);

    match format {
        Format::Svg => {
            let mut svg = SvgFile::new(input.context);
            result.into_iter().for_each(|x| svg.add(x));
            svg.write(writer)?;
        }
        Format::Json => {
            let shapes = Shapes::from_geometry(&input.context, &result);
            serde_json::to_writer_pretty(writer, &shapes)?;
        }
    }

    info!("Wrote `{}`", args.output.display());
    Ok(())
}

fn run(args: &Args, input: &Input) -> Vec<Geometry> {
    let context = &input.context;
    let config = args.boolean_config();
    let (a, b) = (input.a.segment_set(context), input.b.segment_set(context));

    match args.operation {
        Operation::Union => vec![boolean::union(&a, &b, &config).to_polygons(false).into()],
        Operation::Intersection => {
            vec![boolean::intersection(&a, &b, &config).to_polygons(false).into()]
        }
        Operation::Difference => {
            vec![boolean::difference(&a, &b, &config).to_polygons(false).into()]
        }
        Operation::FullDifference => {
            let out = boolean::full_difference(&a, &b, &config);
            [out.a_only, out.b_only, out.both]
                .into_iter()
                .map(|x| x.to_polygons(false).into())
                .collect()
        }
        Operation::Offset => {
            let offset = args.offset_config();
            let polygons = input.a.polygon_set(context);
            vec![polygons
                .offset(offset.distance, offset.tolerance)
                .normalize(&config)
                .into()]
        }
        Operation::Decimate => {
            let decimate = args.decimate_config();
            vec![input.a.polygon_set(context).decimate(decimate.tolerance).into()]
        }
        Operation::Infill => {
            let contour = boolean::normalize(&a, &config).to_polygons(false);
            let lines = infill::generate(&contour, &args.infill_config());
            vec![contour.into(), lines.into()]
        }
    }
}
