use inflection_engine::{
    analyze, compute_changes, filter_alternating, locate_rise_segment, scan_extrema,
    screen_paths, try_analyze,
};
use shared_models::{AnalysisOptions, Direction, PointKind, SeriesIndex};
use tests::{high_tight_flag, series_from_closes, turning_point};

fn window(window_size: usize) -> AnalysisOptions {
    AnalysisOptions {
        window_size,
        ..Default::default()
    }
}

#[test]
fn rise_segment_from_running_minimum() {
    let series =
        series_from_closes(&[100.0, 90.0, 80.0, 70.0, 80.0, 90.0, 100.0, 110.0, 160.0, 161.0]);
    let segment = locate_rise_segment(&series).expect("segment");

    assert_eq!(segment.start_index, SeriesIndex(3));
    assert_eq!(segment.end_index, SeriesIndex(8));
    assert_eq!(segment.min_price, 70.0);
    assert_eq!(segment.peak_price, 160.0);
    assert!((segment.rise_percentage - 128.57).abs() < 0.01);
}

#[test]
fn empty_input_is_no_signal() {
    assert!(locate_rise_segment(&[]).is_none());
    assert!(analyze(&[], &AnalysisOptions::default()).is_none());
}

#[test]
fn short_series_has_no_extrema() {
    let series = series_from_closes(&[5.0, 7.0, 4.0, 6.0]);
    assert!(scan_extrema(&series, SeriesIndex(0), 2).is_empty());
}

#[test]
fn close_second_peak_is_dropped() {
    let points = vec![
        turning_point(4, PointKind::Peak, 100.0, 95.0),
        turning_point(8, PointKind::Peak, 102.0, 97.0),
    ];
    let kept = filter_alternating(&points, 3.0);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].index, SeriesIndex(4));
}

#[test]
fn trough_to_peak_change_record() {
    let points = vec![
        turning_point(2, PointKind::Trough, 110.0, 100.0),
        turning_point(6, PointKind::Peak, 150.0, 140.0),
    ];
    let changes = compute_changes(&points);

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].change_percent, 50.0);
    assert_eq!(changes[0].direction, Direction::Up);
    assert_eq!(changes[0].magnitude, 50.0);
}

#[test]
fn ungated_series_without_extrema_is_no_signal() {
    let series = series_from_closes(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0]);
    let opts = AnalysisOptions {
        enable_100_percent_rise: false,
        ..window(2)
    };
    assert!(analyze(&series, &opts).is_none());
}

#[test]
fn high_tight_flag_end_to_end() {
    let series = high_tight_flag();
    let result = analyze(&series, &window(2)).expect("pattern");

    let segment = result.rise_segment.as_ref().expect("rise segment");
    assert_eq!(segment.start_index, SeriesIndex(1));
    assert_eq!(segment.end_index, SeriesIndex(5));

    let turns: Vec<(usize, PointKind)> = result
        .inflection_points
        .iter()
        .map(|p| (p.index.get(), p.kind))
        .collect();
    assert_eq!(
        turns,
        vec![
            (6, PointKind::Peak),
            (9, PointKind::Trough),
            (12, PointKind::Peak),
            (15, PointKind::Trough),
            (18, PointKind::Peak),
        ]
    );

    let directions: Vec<Direction> =
        result.percentage_changes.iter().map(|c| c.direction).collect();
    assert_eq!(
        directions,
        vec![Direction::Down, Direction::Up, Direction::Down, Direction::Up]
    );
    for change in &result.percentage_changes {
        assert_eq!(change.direction == Direction::Up, change.change_percent > 0.0);
        assert_eq!(change.magnitude, change.change_percent.abs());
        // indices address the caller's series
        assert_eq!(series[change.from_index.get()].date, change.from_date);
        assert_eq!(series[change.to_index.get()].date, change.to_date);
    }
    assert_eq!(result.summary.inflection_point_count, 5);
    assert!(result.summary.average_change > 3.0);
}

#[test]
fn result_serializes_to_renderer_contract() {
    let result = analyze(&high_tight_flag(), &window(2)).expect("pattern");
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["riseSegment"]["startIndex"], 1);
    assert_eq!(json["riseSegment"]["endIndex"], 5);
    assert_eq!(json["inflectionPoints"][0]["type"], "peak");
    assert_eq!(json["inflectionPoints"][0]["index"], 6);
    assert_eq!(json["percentageChanges"][0]["direction"], "down");
    assert_eq!(json["percentageChanges"][0]["fromIndex"], 6);
    assert_eq!(json["summary"]["riseSegmentExists"], true);
    assert_eq!(json["summary"]["inflectionPointCount"], 5);
}

#[test]
fn repeated_and_parallel_runs_agree() {
    let series = high_tight_flag();
    let opts = window(2);
    let first = analyze(&series, &opts);
    assert_eq!(first, analyze(&series, &opts));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| analyze(&series, &opts)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), first);
        }
    });
}

#[test]
fn non_finite_close_fails_soft() {
    let mut series = high_tight_flag();
    series[10].close = f64::NAN;
    assert!(try_analyze(&series, &window(2)).is_err());
    assert!(analyze(&series, &window(2)).is_none());
}

#[test]
fn dates_are_taken_as_given() {
    let sorted = high_tight_flag();
    let mut reordered = sorted.clone();
    let last = reordered.len() - 1;
    let first_date = reordered[0].date;
    reordered[0].date = reordered[last].date;
    reordered[last].date = first_date;
    reordered[last].open = 0.0;

    let expected = analyze(&sorted, &window(2)).expect("pattern");
    let result = analyze(&reordered, &window(2)).expect("pattern despite date order");
    assert_eq!(result.inflection_points.len(), expected.inflection_points.len());
    assert_eq!(result.percentage_changes, expected.percentage_changes);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn screener_reads_files_and_ranks_hits() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let dir = tempfile::tempdir()?;

    std::fs::write(
        dir.path().join("FLAG.json"),
        serde_json::to_string(&high_tight_flag())?,
    )?;

    let mut csv = String::from("date,open,high,low,close,volume\n");
    for point in series_from_closes(&[10.0, 10.4, 10.1, 10.3, 10.2, 10.5]) {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            point.date.format("%Y-%m-%d"),
            point.open,
            point.high,
            point.low,
            point.close,
            point.volume.unwrap_or_default()
        ));
    }
    std::fs::write(dir.path().join("QUIET.csv"), csv)?;
    std::fs::write(dir.path().join("JUNK.json"), "[{]")?;

    let inputs = inflection_engine::collect_inputs(&[dir.path()])?;
    assert_eq!(inputs.len(), 3);

    let report = screen_paths(inputs, window(2), 2).await?;
    assert_eq!(report.hits.len(), 1);
    assert_eq!(report.hits[0].symbol, "FLAG");
    assert_eq!(report.no_signal, vec!["QUIET"]);
    assert_eq!(report.failed, vec!["JUNK"]);

    let json = serde_json::to_value(&report)?;
    assert_eq!(json["hits"][0]["result"]["summary"]["inflectionPointCount"], 5);
    assert_eq!(json["options"]["windowSize"], 2);
    Ok(())
}
