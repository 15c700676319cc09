//! 坐标平面管线测试
//!
//! 基础平面在模拟设备上的行为：
//! 1. 同步运动按位移比例分配速度，期间仪器打开
//! 2. 单轴触发限位时报告第一个错误，两轴都回到空闲
//! 3. 停止句柄可以从其它线程取消阻塞中的运动
//! 4. 回零 / 测量、使用计数、平面栈复制到预览平面

mod common;

use common::{EventRecorder, MockInstrument, MockMotor, drain};
use gantry_sdk::ctrl::{InstrumentEventListener, MotorEventListener};
use gantry_sdk::prelude::*;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

struct Bench {
    x_motor: Arc<MockMotor>,
    y_motor: Arc<MockMotor>,
    x: Arc<MotorController>,
    y: Arc<MotorController>,
    instrument: Arc<InstrumentController>,
}

fn bench(min: i64, max: i64) -> Bench {
    bench_with_poll(min, max, Duration::from_micros(50))
}

fn bench_with_poll(min: i64, max: i64, poll_interval: Duration) -> Bench {
    let config = MotorControllerConfig {
        roll_step: 100,
        roll_speed: 50.0,
        trailer_comeback: 8,
        poll_interval,
    };
    let x_motor = Arc::new(MockMotor::new(0, min, max));
    let y_motor = Arc::new(MockMotor::new(1, min, max));
    Bench {
        x: Arc::new(MotorController::new(x_motor.clone(), config.clone())),
        y: Arc::new(MotorController::new(y_motor.clone(), config)),
        x_motor,
        y_motor,
        instrument: Arc::new(InstrumentController::new(Arc::new(MockInstrument::new(0)))),
    }
}

impl Bench {
    fn plane(&self, with_instrument: bool) -> CoordController {
        CoordController::new(
            self.x.clone(),
            self.y.clone(),
            with_instrument.then(|| self.instrument.clone()),
            Default::default(),
        )
    }
}

#[test]
fn test_sync_move_splits_speed() {
    let bench = bench(-10_000, 10_000);
    let plane = bench.plane(false);

    plane.move_to(MotorPoint::new(300, 400), 500.0, true).unwrap();
    assert_eq!(plane.position(), MotorPoint::new(300, 400));

    let (x_dest, x_speed) = bench.x_motor.starts()[0];
    let (y_dest, y_speed) = bench.y_motor.starts()[0];
    assert_eq!((x_dest, y_dest), (300, 400));
    assert!((x_speed - 300.0).abs() < 1e-3, "{x_speed}");
    assert!((y_speed - 400.0).abs() < 1e-3, "{y_speed}");

    // 非同步运动两轴都用原速度
    plane.move_to(MotorPoint::new(0, 0), 500.0, false).unwrap();
    assert_eq!(bench.x_motor.starts()[1].1, 500.0);
    assert_eq!(bench.y_motor.starts()[1].1, 500.0);
}

#[test]
fn test_instrument_enabled_during_sync_move() {
    let bench = bench(-10_000, 10_000);
    let (recorder, rx) = EventRecorder::new();
    bench
        .instrument
        .add_event_listener(Arc::new(recorder) as Arc<dyn InstrumentEventListener>);
    let plane = bench.plane(true);
    drain(&rx);

    plane.move_to(MotorPoint::new(10, 10), 100.0, false).unwrap();
    assert!(drain(&rx).is_empty());

    plane.move_to(MotorPoint::new(20, 20), 100.0, true).unwrap();
    assert_eq!(
        drain(&rx),
        vec![
            "state runnable=true enabled=true".to_string(),
            "state runnable=true enabled=false".to_string(),
        ]
    );
    assert!(!bench.instrument.is_enabled());
}

#[test]
fn test_trailer_on_one_axis_fails_whole_move() {
    let bench = bench(-100, 100);
    let (recorder, rx) = EventRecorder::new();
    bench
        .x
        .add_event_listener(Arc::new(recorder) as Arc<dyn MotorEventListener>);
    let plane = bench.plane(false);
    drain(&rx);

    let result = plane.move_to(MotorPoint::new(500, 50), 100.0, true);
    assert!(matches!(result, Err(MotionError::Trailer2Pressed)));

    for axis in [&bench.x, &bench.y] {
        assert!(!axis.is_working());
        assert!(!axis.is_moving());
    }
    assert_eq!(plane.position(), MotorPoint::new(100, 50));
    assert_eq!(
        drain(&rx),
        vec![
            "moving 500".to_string(),
            "stopped Trailer #2 pressed".to_string()
        ]
    );

    // 平面仍然可用
    plane.move_to(MotorPoint::new(0, 0), 100.0, true).unwrap();
}

#[test]
fn test_power_off_refuses_plane_move() {
    let bench = bench(-100, 100);
    let plane = bench.plane(false);
    bench.y.enable_power(false).unwrap();

    assert!(matches!(
        plane.move_to(MotorPoint::new(10, 10), 10.0, true),
        Err(MotionError::PowerOff)
    ));
    assert!(bench.x_motor.starts().is_empty());
    assert!(matches!(
        plane.calibrate(TrailerId::Trailer1),
        Err(MotionError::PowerOff)
    ));
}

#[test]
fn test_stop_handle_cancels_move() {
    let bench = bench(-10_000, 10_000);
    bench.x_motor.hold.store(true, Ordering::SeqCst);
    let plane = Arc::new(bench.plane(false));
    let handle = plane.stop_handle();

    let worker = {
        let plane = plane.clone();
        thread::spawn(move || plane.move_to(MotorPoint::new(500, 500), 100.0, false))
    };
    while bench.x_motor.starts().is_empty() || !bench.x.is_working() {
        thread::yield_now();
    }
    handle.stop();

    let result = worker.join().unwrap();
    assert!(matches!(result, Err(MotionError::Stopped)));
    assert!(!bench.x.is_working());
    assert!(!bench.y.is_working());
    assert!(!bench.x.is_moving());
}

#[test]
fn test_cancelled_plane_move_leaves_new_axis_move_alone() {
    let bench = bench_with_poll(-10_000, 10_000, Duration::from_millis(20));
    bench.x_motor.hold.store(true, Ordering::SeqCst);
    bench.y_motor.hold.store(true, Ordering::SeqCst);
    let plane = Arc::new(bench.plane(false));

    let worker = {
        let plane = plane.clone();
        thread::spawn(move || plane.move_to(MotorPoint::new(500, 500), 100.0, false))
    };
    while bench.x_motor.starts().is_empty() || bench.y_motor.starts().is_empty() {
        thread::yield_now();
    }

    // 平面运动还在睡眠时，X 轴被新的异步运动占用
    plane.stop();
    let token = bench.x.async_move(-200, 10.0, false).unwrap();

    let result = worker.join().unwrap();
    assert!(matches!(result, Err(MotionError::Stopped)));
    assert!(bench.x.holds_claim(token));
    assert!(bench.x.is_moving());
    assert_eq!(bench.x.destination(), MoveType::MoveDown);
    assert!(!bench.y.is_working());

    bench.x.async_stop(token, Ok(()), -200, 10.0, false).unwrap();
    assert!(!bench.x.is_working());
    assert!(!bench.x.is_moving());
}

#[test]
fn test_calibrate_and_measure() {
    let bench = bench(-1_000, 2_000);
    let plane = bench.plane(false);
    assert!(!plane.is_measured());
    assert!(matches!(plane.size(), Err(MotionError::Unmeasured)));

    plane.calibrate(TrailerId::Trailer1).unwrap();
    assert_eq!(plane.position(), MotorPoint::new(-992, -992));

    plane.measure(TrailerId::Trailer1).unwrap();
    assert!(plane.is_measured());
    // 两端都回退了 8 步
    assert_eq!(plane.size().unwrap(), MotorRect::new(-992, -992, 2984, 2984));
    assert_eq!(plane.position(), MotorPoint::new(-992, -992));
}

#[test]
fn test_usage_follows_plane_lifetime() {
    let bench = bench(-100, 100);
    let (recorder, rx) = EventRecorder::new();
    bench
        .y
        .add_event_listener(Arc::new(recorder) as Arc<dyn MotorEventListener>);

    let plane = bench.plane(true);
    assert_eq!(bench.x.usage_count(), 1);
    assert_eq!(bench.y.usage_count(), 1);
    assert_eq!(bench.instrument.usage_count(), 1);

    drop(plane);
    assert_eq!(bench.x.usage_count(), 0);
    assert_eq!(bench.instrument.usage_count(), 0);
    assert_eq!(drain(&rx), vec!["use".to_string(), "unuse".to_string()]);
}

#[test]
fn test_arc_on_base_plane() {
    let bench = bench(-10_000, 10_000);
    let plane = bench.plane(false);
    plane.move_to(MotorPoint::new(1000, 0), 100.0, true).unwrap();

    plane
        .arc(
            MotorPoint::new(0, 1000),
            MotorPoint::new(0, 0),
            ArcDirection::CounterClockwise,
            100.0,
            true,
            1.0,
        )
        .unwrap();
    assert_eq!(plane.position(), MotorPoint::new(0, 1000));
    // 每段都是一次两轴运动
    assert!(bench.x_motor.starts().len() > 10);
}

#[test]
fn test_stack_clone_onto_preview() {
    let bench = bench(-10_000, 10_000);
    let mut stack = CoordPlaneStack::new(Box::new(bench.plane(false)));
    stack.push(|base| {
        Box::new(CoordPlaneValidator::new(
            base,
            MotorPoint::new(-500, -500),
            MotorPoint::new(500, 500),
            1000.0,
        ))
    });
    stack.push(|base| Box::new(CoordPlaneLog::new(base, "real")));

    let mut preview = stack.clone_onto(Box::new(VirtualCoordPlane::new(MotorRect::new(
        -5_000, -5_000, 10_000, 10_000,
    ))));
    preview.push(|base| Box::new(CoordPlaneTracker::new(base)));

    preview.move_to(MotorPoint::new(200, 300), 500.0, true).unwrap();
    assert!(matches!(
        preview.move_to(MotorPoint::new(800, 0), 500.0, true),
        Err(MotionError::InvalidCoordinates { .. })
    ));
    assert_eq!(preview.position(), MotorPoint::new(200, 300));

    // 预览不驱动真实电机
    assert!(bench.x_motor.starts().is_empty());
    assert_eq!(stack.position(), MotorPoint::new(0, 0));

    stack.move_to(MotorPoint::new(200, 300), 500.0, true).unwrap();
    assert_eq!(bench.x_motor.starts().len(), 1);
}
