// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Prebuilt standard message catalog.
//!
//! Field tables for the interface packages shipped with the middleware
//! distribution. Kept in one flat file so the catalog can be regenerated
//! wholesale from the installed interface definitions.

use super::{ConstValue, Constant, FieldKind, Primitive, Schema, TypeMap};

const BOOL: Primitive = Primitive::Bool;
const I8: Primitive = Primitive::Int8;
const I16: Primitive = Primitive::Int16;
const I32: Primitive = Primitive::Int32;
const I64: Primitive = Primitive::Int64;
const U8: Primitive = Primitive::UInt8;
const U16: Primitive = Primitive::UInt16;
const U32: Primitive = Primitive::UInt32;
const U64: Primitive = Primitive::UInt64;
const F32: Primitive = Primitive::Float32;
const F64: Primitive = Primitive::Float64;
const STR: Primitive = Primitive::String;

fn base(primitive: Primitive) -> FieldKind {
    FieldKind::Base(primitive)
}

fn name(typename: &str) -> FieldKind {
    FieldKind::Name(typename.to_string())
}

fn array(elem: FieldKind, length: u32) -> FieldKind {
    FieldKind::Array(Box::new(elem), length)
}

fn sequence(elem: FieldKind) -> FieldKind {
    FieldKind::Sequence(Box::new(elem), None)
}

fn field(fname: &str, kind: FieldKind) -> (String, FieldKind) {
    (fname.to_string(), kind)
}

fn iconst(cname: &str, primitive: Primitive, value: i64) -> Constant {
    Constant {
        name: cname.to_string(),
        primitive,
        value: ConstValue::Int(value),
    }
}

fn msgtype(
    typename: &str,
    constants: Vec<Constant>,
    fields: Vec<(String, FieldKind)>,
) -> (String, Schema) {
    (typename.to_string(), Schema { constants, fields })
}

/// The minimal set every recording needs: Time, Duration, and Header.
pub(crate) fn core_types() -> TypeMap {
    vec![
        msgtype(
            "builtin_interfaces/msg/Time",
            vec![],
            vec![field("sec", base(I32)), field("nanosec", base(U32))],
        ),
        msgtype(
            "builtin_interfaces/msg/Duration",
            vec![],
            vec![field("sec", base(I32)), field("nanosec", base(U32))],
        ),
        msgtype(
            "std_msgs/msg/Header",
            vec![],
            vec![
                field("stamp", name("builtin_interfaces/msg/Time")),
                field("frame_id", base(STR)),
            ],
        ),
    ]
}

/// The full standard catalog.
pub(crate) fn standard_types() -> TypeMap {
    let mut types = core_types();
    types.extend(diagnostic_msgs());
    types.extend(geometry_msgs());
    types.extend(lifecycle_msgs());
    types.extend(nav_msgs());
    types.extend(rcl_interfaces());
    types.extend(rmw_dds_common());
    types.extend(rosgraph_msgs());
    types.extend(sensor_msgs());
    types.extend(shape_msgs());
    types.extend(statistics_msgs());
    types.extend(std_msgs());
    types.extend(stereo_msgs());
    types.extend(tf2_msgs());
    types.extend(trajectory_msgs());
    types.extend(unique_identifier_msgs());
    types.extend(visualization_msgs());
    types
}

fn diagnostic_msgs() -> TypeMap {
    vec![
        msgtype(
            "diagnostic_msgs/msg/DiagnosticArray",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("status", sequence(name("diagnostic_msgs/msg/DiagnosticStatus"))),
            ],
        ),
        msgtype(
            "diagnostic_msgs/msg/DiagnosticStatus",
            vec![
                iconst("OK", U8, 0),
                iconst("WARN", U8, 1),
                iconst("ERROR", U8, 2),
                iconst("STALE", U8, 3),
            ],
            vec![
                field("level", base(U8)),
                field("name", base(STR)),
                field("message", base(STR)),
                field("hardware_id", base(STR)),
                field("values", sequence(name("diagnostic_msgs/msg/KeyValue"))),
            ],
        ),
        msgtype(
            "diagnostic_msgs/msg/KeyValue",
            vec![],
            vec![field("key", base(STR)), field("value", base(STR))],
        ),
    ]
}

fn geometry_msgs() -> TypeMap {
    vec![
        msgtype(
            "geometry_msgs/msg/Accel",
            vec![],
            vec![
                field("linear", name("geometry_msgs/msg/Vector3")),
                field("angular", name("geometry_msgs/msg/Vector3")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/AccelStamped",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("accel", name("geometry_msgs/msg/Accel")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/AccelWithCovariance",
            vec![],
            vec![
                field("accel", name("geometry_msgs/msg/Accel")),
                field("covariance", array(base(F64), 36)),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/AccelWithCovarianceStamped",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("accel", name("geometry_msgs/msg/AccelWithCovariance")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/Inertia",
            vec![],
            vec![
                field("m", base(F64)),
                field("com", name("geometry_msgs/msg/Vector3")),
                field("ixx", base(F64)),
                field("ixy", base(F64)),
                field("ixz", base(F64)),
                field("iyy", base(F64)),
                field("iyz", base(F64)),
                field("izz", base(F64)),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/InertiaStamped",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("inertia", name("geometry_msgs/msg/Inertia")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/Point",
            vec![],
            vec![
                field("x", base(F64)),
                field("y", base(F64)),
                field("z", base(F64)),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/Point32",
            vec![],
            vec![
                field("x", base(F32)),
                field("y", base(F32)),
                field("z", base(F32)),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/PointStamped",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("point", name("geometry_msgs/msg/Point")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/Polygon",
            vec![],
            vec![field("points", sequence(name("geometry_msgs/msg/Point32")))],
        ),
        msgtype(
            "geometry_msgs/msg/PolygonStamped",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("polygon", name("geometry_msgs/msg/Polygon")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/Pose",
            vec![],
            vec![
                field("position", name("geometry_msgs/msg/Point")),
                field("orientation", name("geometry_msgs/msg/Quaternion")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/Pose2D",
            vec![],
            vec![
                field("x", base(F64)),
                field("y", base(F64)),
                field("theta", base(F64)),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/PoseArray",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("poses", sequence(name("geometry_msgs/msg/Pose"))),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/PoseStamped",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("pose", name("geometry_msgs/msg/Pose")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/PoseWithCovariance",
            vec![],
            vec![
                field("pose", name("geometry_msgs/msg/Pose")),
                field("covariance", array(base(F64), 36)),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/PoseWithCovarianceStamped",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("pose", name("geometry_msgs/msg/PoseWithCovariance")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/Quaternion",
            vec![],
            vec![
                field("x", base(F64)),
                field("y", base(F64)),
                field("z", base(F64)),
                field("w", base(F64)),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/QuaternionStamped",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("quaternion", name("geometry_msgs/msg/Quaternion")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/Transform",
            vec![],
            vec![
                field("translation", name("geometry_msgs/msg/Vector3")),
                field("rotation", name("geometry_msgs/msg/Quaternion")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/TransformStamped",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("child_frame_id", base(STR)),
                field("transform", name("geometry_msgs/msg/Transform")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/Twist",
            vec![],
            vec![
                field("linear", name("geometry_msgs/msg/Vector3")),
                field("angular", name("geometry_msgs/msg/Vector3")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/TwistStamped",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("twist", name("geometry_msgs/msg/Twist")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/TwistWithCovariance",
            vec![],
            vec![
                field("twist", name("geometry_msgs/msg/Twist")),
                field("covariance", array(base(F64), 36)),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/TwistWithCovarianceStamped",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("twist", name("geometry_msgs/msg/TwistWithCovariance")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/Vector3",
            vec![],
            vec![
                field("x", base(F64)),
                field("y", base(F64)),
                field("z", base(F64)),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/Vector3Stamped",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("vector", name("geometry_msgs/msg/Vector3")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/Wrench",
            vec![],
            vec![
                field("force", name("geometry_msgs/msg/Vector3")),
                field("torque", name("geometry_msgs/msg/Vector3")),
            ],
        ),
        msgtype(
            "geometry_msgs/msg/WrenchStamped",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("wrench", name("geometry_msgs/msg/Wrench")),
            ],
        ),
    ]
}

fn lifecycle_msgs() -> TypeMap {
    vec![
        msgtype(
            "lifecycle_msgs/msg/State",
            vec![
                iconst("PRIMARY_STATE_UNKNOWN", U8, 0),
                iconst("PRIMARY_STATE_UNCONFIGURED", U8, 1),
                iconst("PRIMARY_STATE_INACTIVE", U8, 2),
                iconst("PRIMARY_STATE_ACTIVE", U8, 3),
                iconst("PRIMARY_STATE_FINALIZED", U8, 4),
                iconst("TRANSITION_STATE_CONFIGURING", U8, 10),
                iconst("TRANSITION_STATE_CLEANINGUP", U8, 11),
                iconst("TRANSITION_STATE_SHUTTINGDOWN", U8, 12),
                iconst("TRANSITION_STATE_ACTIVATING", U8, 13),
                iconst("TRANSITION_STATE_DEACTIVATING", U8, 14),
                iconst("TRANSITION_STATE_ERRORPROCESSING", U8, 15),
            ],
            vec![field("id", base(U8)), field("label", base(STR))],
        ),
        msgtype(
            "lifecycle_msgs/msg/Transition",
            vec![
                iconst("TRANSITION_CREATE", U8, 0),
                iconst("TRANSITION_CONFIGURE", U8, 1),
                iconst("TRANSITION_CLEANUP", U8, 2),
                iconst("TRANSITION_ACTIVATE", U8, 3),
                iconst("TRANSITION_DEACTIVATE", U8, 4),
                iconst("TRANSITION_UNCONFIGURED_SHUTDOWN", U8, 5),
                iconst("TRANSITION_INACTIVE_SHUTDOWN", U8, 6),
                iconst("TRANSITION_ACTIVE_SHUTDOWN", U8, 7),
                iconst("TRANSITION_DESTROY", U8, 8),
                iconst("TRANSITION_ON_CONFIGURE_SUCCESS", U8, 10),
                iconst("TRANSITION_ON_CONFIGURE_FAILURE", U8, 11),
                iconst("TRANSITION_ON_CONFIGURE_ERROR", U8, 12),
                iconst("TRANSITION_ON_CLEANUP_SUCCESS", U8, 20),
                iconst("TRANSITION_ON_CLEANUP_FAILURE", U8, 21),
                iconst("TRANSITION_ON_CLEANUP_ERROR", U8, 22),
                iconst("TRANSITION_ON_ACTIVATE_SUCCESS", U8, 30),
                iconst("TRANSITION_ON_ACTIVATE_FAILURE", U8, 31),
                iconst("TRANSITION_ON_ACTIVATE_ERROR", U8, 32),
                iconst("TRANSITION_ON_DEACTIVATE_SUCCESS", U8, 40),
                iconst("TRANSITION_ON_DEACTIVATE_FAILURE", U8, 41),
                iconst("TRANSITION_ON_DEACTIVATE_ERROR", U8, 42),
                iconst("TRANSITION_ON_SHUTDOWN_SUCCESS", U8, 50),
                iconst("TRANSITION_ON_SHUTDOWN_FAILURE", U8, 51),
                iconst("TRANSITION_ON_SHUTDOWN_ERROR", U8, 52),
                iconst("TRANSITION_ON_ERROR_SUCCESS", U8, 60),
                iconst("TRANSITION_ON_ERROR_FAILURE", U8, 61),
                iconst("TRANSITION_ON_ERROR_ERROR", U8, 62),
                iconst("TRANSITION_CALLBACK_SUCCESS", U8, 97),
                iconst("TRANSITION_CALLBACK_FAILURE", U8, 98),
                iconst("TRANSITION_CALLBACK_ERROR", U8, 99),
            ],
            vec![field("id", base(U8)), field("label", base(STR))],
        ),
        msgtype(
            "lifecycle_msgs/msg/TransitionDescription",
            vec![],
            vec![
                field("transition", name("lifecycle_msgs/msg/Transition")),
                field("start_state", name("lifecycle_msgs/msg/State")),
                field("goal_state", name("lifecycle_msgs/msg/State")),
            ],
        ),
        msgtype(
            "lifecycle_msgs/msg/TransitionEvent",
            vec![],
            vec![
                field("timestamp", base(U64)),
                field("transition", name("lifecycle_msgs/msg/Transition")),
                field("start_state", name("lifecycle_msgs/msg/State")),
                field("goal_state", name("lifecycle_msgs/msg/State")),
            ],
        ),
    ]
}

fn nav_msgs() -> TypeMap {
    vec![
        msgtype(
            "nav_msgs/msg/GridCells",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("cell_width", base(F32)),
                field("cell_height", base(F32)),
                field("cells", sequence(name("geometry_msgs/msg/Point"))),
            ],
        ),
        msgtype(
            "nav_msgs/msg/MapMetaData",
            vec![],
            vec![
                field("map_load_time", name("builtin_interfaces/msg/Time")),
                field("resolution", base(F32)),
                field("width", base(U32)),
                field("height", base(U32)),
                field("origin", name("geometry_msgs/msg/Pose")),
            ],
        ),
        msgtype(
            "nav_msgs/msg/OccupancyGrid",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("info", name("nav_msgs/msg/MapMetaData")),
                field("data", sequence(base(I8))),
            ],
        ),
        msgtype(
            "nav_msgs/msg/Odometry",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("child_frame_id", base(STR)),
                field("pose", name("geometry_msgs/msg/PoseWithCovariance")),
                field("twist", name("geometry_msgs/msg/TwistWithCovariance")),
            ],
        ),
        msgtype(
            "nav_msgs/msg/Path",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("poses", sequence(name("geometry_msgs/msg/PoseStamped"))),
            ],
        ),
    ]
}

fn rcl_interfaces() -> TypeMap {
    vec![
        msgtype(
            "rcl_interfaces/msg/FloatingPointRange",
            vec![],
            vec![
                field("from_value", base(F64)),
                field("to_value", base(F64)),
                field("step", base(F64)),
            ],
        ),
        msgtype(
            "rcl_interfaces/msg/IntegerRange",
            vec![],
            vec![
                field("from_value", base(I64)),
                field("to_value", base(I64)),
                field("step", base(U64)),
            ],
        ),
        msgtype(
            "rcl_interfaces/msg/ListParametersResult",
            vec![],
            vec![
                field("names", sequence(base(STR))),
                field("prefixes", sequence(base(STR))),
            ],
        ),
        msgtype(
            "rcl_interfaces/msg/Log",
            vec![
                iconst("DEBUG", U8, 10),
                iconst("INFO", U8, 20),
                iconst("WARN", U8, 30),
                iconst("ERROR", U8, 40),
                iconst("FATAL", U8, 50),
            ],
            vec![
                field("stamp", name("builtin_interfaces/msg/Time")),
                field("level", base(U8)),
                field("name", base(STR)),
                field("msg", base(STR)),
                field("file", base(STR)),
                field("function", base(STR)),
                field("line", base(U32)),
            ],
        ),
        msgtype(
            "rcl_interfaces/msg/Parameter",
            vec![],
            vec![
                field("name", base(STR)),
                field("value", name("rcl_interfaces/msg/ParameterValue")),
            ],
        ),
        msgtype(
            "rcl_interfaces/msg/ParameterDescriptor",
            vec![],
            vec![
                field("name", base(STR)),
                field("type", base(U8)),
                field("description", base(STR)),
                field("additional_constraints", base(STR)),
                field("read_only", base(BOOL)),
                field(
                    "floating_point_range",
                    sequence(name("rcl_interfaces/msg/FloatingPointRange")),
                ),
                field("integer_range", sequence(name("rcl_interfaces/msg/IntegerRange"))),
            ],
        ),
        msgtype(
            "rcl_interfaces/msg/ParameterEvent",
            vec![],
            vec![
                field("stamp", name("builtin_interfaces/msg/Time")),
                field("node", base(STR)),
                field("new_parameters", sequence(name("rcl_interfaces/msg/Parameter"))),
                field("changed_parameters", sequence(name("rcl_interfaces/msg/Parameter"))),
                field("deleted_parameters", sequence(name("rcl_interfaces/msg/Parameter"))),
            ],
        ),
        msgtype(
            "rcl_interfaces/msg/ParameterEventDescriptors",
            vec![],
            vec![
                field(
                    "new_parameters",
                    sequence(name("rcl_interfaces/msg/ParameterDescriptor")),
                ),
                field(
                    "changed_parameters",
                    sequence(name("rcl_interfaces/msg/ParameterDescriptor")),
                ),
                field(
                    "deleted_parameters",
                    sequence(name("rcl_interfaces/msg/ParameterDescriptor")),
                ),
            ],
        ),
        msgtype(
            "rcl_interfaces/msg/ParameterType",
            vec![
                iconst("PARAMETER_NOT_SET", U8, 0),
                iconst("PARAMETER_BOOL", U8, 1),
                iconst("PARAMETER_INTEGER", U8, 2),
                iconst("PARAMETER_DOUBLE", U8, 3),
                iconst("PARAMETER_STRING", U8, 4),
                iconst("PARAMETER_BYTE_ARRAY", U8, 5),
                iconst("PARAMETER_BOOL_ARRAY", U8, 6),
                iconst("PARAMETER_INTEGER_ARRAY", U8, 7),
                iconst("PARAMETER_DOUBLE_ARRAY", U8, 8),
                iconst("PARAMETER_STRING_ARRAY", U8, 9),
            ],
            vec![field("structure_needs_at_least_one_member", base(U8))],
        ),
        msgtype(
            "rcl_interfaces/msg/ParameterValue",
            vec![],
            vec![
                field("type", base(U8)),
                field("bool_value", base(BOOL)),
                field("integer_value", base(I64)),
                field("double_value", base(F64)),
                field("string_value", base(STR)),
                field("byte_array_value", sequence(base(U8))),
                field("bool_array_value", sequence(base(BOOL))),
                field("integer_array_value", sequence(base(I64))),
                field("double_array_value", sequence(base(F64))),
                field("string_array_value", sequence(base(STR))),
            ],
        ),
        msgtype(
            "rcl_interfaces/msg/SetParametersResult",
            vec![],
            vec![field("successful", base(BOOL)), field("reason", base(STR))],
        ),
    ]
}

fn rmw_dds_common() -> TypeMap {
    vec![
        msgtype(
            "rmw_dds_common/msg/Gid",
            vec![],
            vec![field("data", array(base(U8), 24))],
        ),
        msgtype(
            "rmw_dds_common/msg/NodeEntitiesInfo",
            vec![],
            vec![
                field("node_namespace", base(STR)),
                field("node_name", base(STR)),
                field("reader_gid_seq", sequence(name("rmw_dds_common/msg/Gid"))),
                field("writer_gid_seq", sequence(name("rmw_dds_common/msg/Gid"))),
            ],
        ),
        msgtype(
            "rmw_dds_common/msg/ParticipantEntitiesInfo",
            vec![],
            vec![
                field("gid", name("rmw_dds_common/msg/Gid")),
                field(
                    "node_entities_info_seq",
                    sequence(name("rmw_dds_common/msg/NodeEntitiesInfo")),
                ),
            ],
        ),
    ]
}

fn rosgraph_msgs() -> TypeMap {
    vec![msgtype(
        "rosgraph_msgs/msg/Clock",
        vec![],
        vec![field("clock", name("builtin_interfaces/msg/Time"))],
    )]
}

fn sensor_msgs() -> TypeMap {
    vec![
        msgtype(
            "sensor_msgs/msg/BatteryState",
            vec![
                iconst("POWER_SUPPLY_STATUS_UNKNOWN", U8, 0),
                iconst("POWER_SUPPLY_STATUS_CHARGING", U8, 1),
                iconst("POWER_SUPPLY_STATUS_DISCHARGING", U8, 2),
                iconst("POWER_SUPPLY_STATUS_NOT_CHARGING", U8, 3),
                iconst("POWER_SUPPLY_STATUS_FULL", U8, 4),
                iconst("POWER_SUPPLY_HEALTH_UNKNOWN", U8, 0),
                iconst("POWER_SUPPLY_HEALTH_GOOD", U8, 1),
                iconst("POWER_SUPPLY_HEALTH_OVERHEAT", U8, 2),
                iconst("POWER_SUPPLY_HEALTH_DEAD", U8, 3),
                iconst("POWER_SUPPLY_HEALTH_OVERVOLTAGE", U8, 4),
                iconst("POWER_SUPPLY_HEALTH_UNSPEC_FAILURE", U8, 5),
                iconst("POWER_SUPPLY_HEALTH_COLD", U8, 6),
                iconst("POWER_SUPPLY_HEALTH_WATCHDOG_TIMER_EXPIRE", U8, 7),
                iconst("POWER_SUPPLY_HEALTH_SAFETY_TIMER_EXPIRE", U8, 8),
                iconst("POWER_SUPPLY_TECHNOLOGY_UNKNOWN", U8, 0),
                iconst("POWER_SUPPLY_TECHNOLOGY_NIMH", U8, 1),
                iconst("POWER_SUPPLY_TECHNOLOGY_LION", U8, 2),
                iconst("POWER_SUPPLY_TECHNOLOGY_LIPO", U8, 3),
                iconst("POWER_SUPPLY_TECHNOLOGY_LIFE", U8, 4),
                iconst("POWER_SUPPLY_TECHNOLOGY_NICD", U8, 5),
                iconst("POWER_SUPPLY_TECHNOLOGY_LIMN", U8, 6),
            ],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("voltage", base(F32)),
                field("temperature", base(F32)),
                field("current", base(F32)),
                field("charge", base(F32)),
                field("capacity", base(F32)),
                field("design_capacity", base(F32)),
                field("percentage", base(F32)),
                field("power_supply_status", base(U8)),
                field("power_supply_health", base(U8)),
                field("power_supply_technology", base(U8)),
                field("present", base(BOOL)),
                field("cell_voltage", sequence(base(F32))),
                field("cell_temperature", sequence(base(F32))),
                field("location", base(STR)),
                field("serial_number", base(STR)),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/CameraInfo",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("height", base(U32)),
                field("width", base(U32)),
                field("distortion_model", base(STR)),
                field("d", sequence(base(F64))),
                field("k", array(base(F64), 9)),
                field("r", array(base(F64), 9)),
                field("p", array(base(F64), 12)),
                field("binning_x", base(U32)),
                field("binning_y", base(U32)),
                field("roi", name("sensor_msgs/msg/RegionOfInterest")),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/ChannelFloat32",
            vec![],
            vec![field("name", base(STR)), field("values", sequence(base(F32)))],
        ),
        msgtype(
            "sensor_msgs/msg/CompressedImage",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("format", base(STR)),
                field("data", sequence(base(U8))),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/FluidPressure",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("fluid_pressure", base(F64)),
                field("variance", base(F64)),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/Illuminance",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("illuminance", base(F64)),
                field("variance", base(F64)),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/Image",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("height", base(U32)),
                field("width", base(U32)),
                field("encoding", base(STR)),
                field("is_bigendian", base(U8)),
                field("step", base(U32)),
                field("data", sequence(base(U8))),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/Imu",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("orientation", name("geometry_msgs/msg/Quaternion")),
                field("orientation_covariance", array(base(F64), 9)),
                field("angular_velocity", name("geometry_msgs/msg/Vector3")),
                field("angular_velocity_covariance", array(base(F64), 9)),
                field("linear_acceleration", name("geometry_msgs/msg/Vector3")),
                field("linear_acceleration_covariance", array(base(F64), 9)),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/JointState",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("name", sequence(base(STR))),
                field("position", sequence(base(F64))),
                field("velocity", sequence(base(F64))),
                field("effort", sequence(base(F64))),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/Joy",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("axes", sequence(base(F32))),
                field("buttons", sequence(base(I32))),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/JoyFeedback",
            vec![
                iconst("TYPE_LED", U8, 0),
                iconst("TYPE_RUMBLE", U8, 1),
                iconst("TYPE_BUZZER", U8, 2),
            ],
            vec![
                field("type", base(U8)),
                field("id", base(U8)),
                field("intensity", base(F32)),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/JoyFeedbackArray",
            vec![],
            vec![field("array", sequence(name("sensor_msgs/msg/JoyFeedback")))],
        ),
        msgtype(
            "sensor_msgs/msg/LaserEcho",
            vec![],
            vec![field("echoes", sequence(base(F32)))],
        ),
        msgtype(
            "sensor_msgs/msg/LaserScan",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("angle_min", base(F32)),
                field("angle_max", base(F32)),
                field("angle_increment", base(F32)),
                field("time_increment", base(F32)),
                field("scan_time", base(F32)),
                field("range_min", base(F32)),
                field("range_max", base(F32)),
                field("ranges", sequence(base(F32))),
                field("intensities", sequence(base(F32))),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/MagneticField",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("magnetic_field", name("geometry_msgs/msg/Vector3")),
                field("magnetic_field_covariance", array(base(F64), 9)),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/MultiDOFJointState",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("joint_names", sequence(base(STR))),
                field("transforms", sequence(name("geometry_msgs/msg/Transform"))),
                field("twist", sequence(name("geometry_msgs/msg/Twist"))),
                field("wrench", sequence(name("geometry_msgs/msg/Wrench"))),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/MultiEchoLaserScan",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("angle_min", base(F32)),
                field("angle_max", base(F32)),
                field("angle_increment", base(F32)),
                field("time_increment", base(F32)),
                field("scan_time", base(F32)),
                field("range_min", base(F32)),
                field("range_max", base(F32)),
                field("ranges", sequence(name("sensor_msgs/msg/LaserEcho"))),
                field("intensities", sequence(name("sensor_msgs/msg/LaserEcho"))),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/NavSatFix",
            vec![
                iconst("COVARIANCE_TYPE_UNKNOWN", U8, 0),
                iconst("COVARIANCE_TYPE_APPROXIMATED", U8, 1),
                iconst("COVARIANCE_TYPE_DIAGONAL_KNOWN", U8, 2),
                iconst("COVARIANCE_TYPE_KNOWN", U8, 3),
            ],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("status", name("sensor_msgs/msg/NavSatStatus")),
                field("latitude", base(F64)),
                field("longitude", base(F64)),
                field("altitude", base(F64)),
                field("position_covariance", array(base(F64), 9)),
                field("position_covariance_type", base(U8)),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/NavSatStatus",
            vec![
                iconst("STATUS_NO_FIX", I8, -1),
                iconst("STATUS_FIX", I8, 0),
                iconst("STATUS_SBAS_FIX", I8, 1),
                iconst("STATUS_GBAS_FIX", I8, 2),
                iconst("SERVICE_GPS", U16, 1),
                iconst("SERVICE_GLONASS", U16, 2),
                iconst("SERVICE_COMPASS", U16, 4),
                iconst("SERVICE_GALILEO", U16, 8),
            ],
            vec![field("status", base(I8)), field("service", base(U16))],
        ),
        msgtype(
            "sensor_msgs/msg/PointCloud",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("points", sequence(name("geometry_msgs/msg/Point32"))),
                field("channels", sequence(name("sensor_msgs/msg/ChannelFloat32"))),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/PointCloud2",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("height", base(U32)),
                field("width", base(U32)),
                field("fields", sequence(name("sensor_msgs/msg/PointField"))),
                field("is_bigendian", base(BOOL)),
                field("point_step", base(U32)),
                field("row_step", base(U32)),
                field("data", sequence(base(U8))),
                field("is_dense", base(BOOL)),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/PointField",
            vec![
                iconst("INT8", U8, 1),
                iconst("UINT8", U8, 2),
                iconst("INT16", U8, 3),
                iconst("UINT16", U8, 4),
                iconst("INT32", U8, 5),
                iconst("UINT32", U8, 6),
                iconst("FLOAT32", U8, 7),
                iconst("FLOAT64", U8, 8),
            ],
            vec![
                field("name", base(STR)),
                field("offset", base(U32)),
                field("datatype", base(U8)),
                field("count", base(U32)),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/Range",
            vec![iconst("ULTRASOUND", U8, 0), iconst("INFRARED", U8, 1)],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("radiation_type", base(U8)),
                field("field_of_view", base(F32)),
                field("min_range", base(F32)),
                field("max_range", base(F32)),
                field("range", base(F32)),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/RegionOfInterest",
            vec![],
            vec![
                field("x_offset", base(U32)),
                field("y_offset", base(U32)),
                field("height", base(U32)),
                field("width", base(U32)),
                field("do_rectify", base(BOOL)),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/RelativeHumidity",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("relative_humidity", base(F64)),
                field("variance", base(F64)),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/Temperature",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("temperature", base(F64)),
                field("variance", base(F64)),
            ],
        ),
        msgtype(
            "sensor_msgs/msg/TimeReference",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("time_ref", name("builtin_interfaces/msg/Time")),
                field("source", base(STR)),
            ],
        ),
    ]
}

fn shape_msgs() -> TypeMap {
    vec![
        msgtype(
            "shape_msgs/msg/Mesh",
            vec![],
            vec![
                field("triangles", sequence(name("shape_msgs/msg/MeshTriangle"))),
                field("vertices", sequence(name("geometry_msgs/msg/Point"))),
            ],
        ),
        msgtype(
            "shape_msgs/msg/MeshTriangle",
            vec![],
            vec![field("vertex_indices", array(base(U32), 3))],
        ),
        msgtype(
            "shape_msgs/msg/Plane",
            vec![],
            vec![field("coef", array(base(F64), 4))],
        ),
        msgtype(
            "shape_msgs/msg/SolidPrimitive",
            vec![
                iconst("BOX", U8, 1),
                iconst("SPHERE", U8, 2),
                iconst("CYLINDER", U8, 3),
                iconst("CONE", U8, 4),
                iconst("BOX_X", U8, 0),
                iconst("BOX_Y", U8, 1),
                iconst("BOX_Z", U8, 2),
                iconst("SPHERE_RADIUS", U8, 0),
                iconst("CYLINDER_HEIGHT", U8, 0),
                iconst("CYLINDER_RADIUS", U8, 1),
                iconst("CONE_HEIGHT", U8, 0),
                iconst("CONE_RADIUS", U8, 1),
            ],
            vec![field("type", base(U8)), field("dimensions", sequence(base(F64)))],
        ),
    ]
}

fn statistics_msgs() -> TypeMap {
    vec![
        msgtype(
            "statistics_msgs/msg/MetricsMessage",
            vec![],
            vec![
                field("measurement_source_name", base(STR)),
                field("metrics_source", base(STR)),
                field("unit", base(STR)),
                field("window_start", name("builtin_interfaces/msg/Time")),
                field("window_stop", name("builtin_interfaces/msg/Time")),
                field(
                    "statistics",
                    sequence(name("statistics_msgs/msg/StatisticDataPoint")),
                ),
            ],
        ),
        msgtype(
            "statistics_msgs/msg/StatisticDataPoint",
            vec![],
            vec![field("data_type", base(U8)), field("data", base(F64))],
        ),
        msgtype(
            "statistics_msgs/msg/StatisticDataType",
            vec![
                iconst("STATISTICS_DATA_TYPE_UNINITIALIZED", U8, 0),
                iconst("STATISTICS_DATA_TYPE_AVERAGE", U8, 1),
                iconst("STATISTICS_DATA_TYPE_MINIMUM", U8, 2),
                iconst("STATISTICS_DATA_TYPE_MAXIMUM", U8, 3),
                iconst("STATISTICS_DATA_TYPE_STDDEV", U8, 4),
                iconst("STATISTICS_DATA_TYPE_SAMPLE_COUNT", U8, 5),
            ],
            vec![field("structure_needs_at_least_one_member", base(U8))],
        ),
    ]
}

fn std_msgs() -> TypeMap {
    let multi_array = |typename: &str, elem: Primitive| {
        msgtype(
            typename,
            vec![],
            vec![
                field("layout", name("std_msgs/msg/MultiArrayLayout")),
                field("data", sequence(base(elem))),
            ],
        )
    };
    let scalar = |typename: &str, elem: Primitive| {
        msgtype(typename, vec![], vec![field("data", base(elem))])
    };
    vec![
        scalar("std_msgs/msg/Bool", BOOL),
        scalar("std_msgs/msg/Byte", U8),
        multi_array("std_msgs/msg/ByteMultiArray", U8),
        scalar("std_msgs/msg/Char", U8),
        msgtype(
            "std_msgs/msg/ColorRGBA",
            vec![],
            vec![
                field("r", base(F32)),
                field("g", base(F32)),
                field("b", base(F32)),
                field("a", base(F32)),
            ],
        ),
        msgtype(
            "std_msgs/msg/Empty",
            vec![],
            vec![field("structure_needs_at_least_one_member", base(U8))],
        ),
        scalar("std_msgs/msg/Float32", F32),
        multi_array("std_msgs/msg/Float32MultiArray", F32),
        scalar("std_msgs/msg/Float64", F64),
        multi_array("std_msgs/msg/Float64MultiArray", F64),
        scalar("std_msgs/msg/Int16", I16),
        multi_array("std_msgs/msg/Int16MultiArray", I16),
        scalar("std_msgs/msg/Int32", I32),
        multi_array("std_msgs/msg/Int32MultiArray", I32),
        scalar("std_msgs/msg/Int64", I64),
        multi_array("std_msgs/msg/Int64MultiArray", I64),
        scalar("std_msgs/msg/Int8", I8),
        multi_array("std_msgs/msg/Int8MultiArray", I8),
        msgtype(
            "std_msgs/msg/MultiArrayDimension",
            vec![],
            vec![
                field("label", base(STR)),
                field("size", base(U32)),
                field("stride", base(U32)),
            ],
        ),
        msgtype(
            "std_msgs/msg/MultiArrayLayout",
            vec![],
            vec![
                field("dim", sequence(name("std_msgs/msg/MultiArrayDimension"))),
                field("data_offset", base(U32)),
            ],
        ),
        scalar("std_msgs/msg/String", STR),
        scalar("std_msgs/msg/UInt16", U16),
        multi_array("std_msgs/msg/UInt16MultiArray", U16),
        scalar("std_msgs/msg/UInt32", U32),
        multi_array("std_msgs/msg/UInt32MultiArray", U32),
        scalar("std_msgs/msg/UInt64", U64),
        multi_array("std_msgs/msg/UInt64MultiArray", U64),
        scalar("std_msgs/msg/UInt8", U8),
        multi_array("std_msgs/msg/UInt8MultiArray", U8),
    ]
}

fn stereo_msgs() -> TypeMap {
    vec![msgtype(
        "stereo_msgs/msg/DisparityImage",
        vec![],
        vec![
            field("header", name("std_msgs/msg/Header")),
            field("image", name("sensor_msgs/msg/Image")),
            field("f", base(F32)),
            field("t", base(F32)),
            field("valid_window", name("sensor_msgs/msg/RegionOfInterest")),
            field("min_disparity", base(F32)),
            field("max_disparity", base(F32)),
            field("delta_d", base(F32)),
        ],
    )]
}

fn tf2_msgs() -> TypeMap {
    vec![
        msgtype(
            "tf2_msgs/msg/TF2Error",
            vec![
                iconst("NO_ERROR", U8, 0),
                iconst("LOOKUP_ERROR", U8, 1),
                iconst("CONNECTIVITY_ERROR", U8, 2),
                iconst("EXTRAPOLATION_ERROR", U8, 3),
                iconst("INVALID_ARGUMENT_ERROR", U8, 4),
                iconst("TIMEOUT_ERROR", U8, 5),
                iconst("TRANSFORM_ERROR", U8, 6),
            ],
            vec![field("error", base(U8)), field("error_string", base(STR))],
        ),
        msgtype(
            "tf2_msgs/msg/TFMessage",
            vec![],
            vec![field(
                "transforms",
                sequence(name("geometry_msgs/msg/TransformStamped")),
            )],
        ),
    ]
}

fn trajectory_msgs() -> TypeMap {
    vec![
        msgtype(
            "trajectory_msgs/msg/JointTrajectory",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("joint_names", sequence(base(STR))),
                field(
                    "points",
                    sequence(name("trajectory_msgs/msg/JointTrajectoryPoint")),
                ),
            ],
        ),
        msgtype(
            "trajectory_msgs/msg/JointTrajectoryPoint",
            vec![],
            vec![
                field("positions", sequence(base(F64))),
                field("velocities", sequence(base(F64))),
                field("accelerations", sequence(base(F64))),
                field("effort", sequence(base(F64))),
                field("time_from_start", name("builtin_interfaces/msg/Duration")),
            ],
        ),
        msgtype(
            "trajectory_msgs/msg/MultiDOFJointTrajectory",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("joint_names", sequence(base(STR))),
                field(
                    "points",
                    sequence(name("trajectory_msgs/msg/MultiDOFJointTrajectoryPoint")),
                ),
            ],
        ),
        msgtype(
            "trajectory_msgs/msg/MultiDOFJointTrajectoryPoint",
            vec![],
            vec![
                field("transforms", sequence(name("geometry_msgs/msg/Transform"))),
                field("velocities", sequence(name("geometry_msgs/msg/Twist"))),
                field("accelerations", sequence(name("geometry_msgs/msg/Twist"))),
                field("time_from_start", name("builtin_interfaces/msg/Duration")),
            ],
        ),
    ]
}

fn unique_identifier_msgs() -> TypeMap {
    vec![msgtype(
        "unique_identifier_msgs/msg/UUID",
        vec![],
        vec![field("uuid", array(base(U8), 16))],
    )]
}

fn visualization_msgs() -> TypeMap {
    vec![
        msgtype(
            "visualization_msgs/msg/ImageMarker",
            vec![
                iconst("CIRCLE", I32, 0),
                iconst("LINE_STRIP", I32, 1),
                iconst("LINE_LIST", I32, 2),
                iconst("POLYGON", I32, 3),
                iconst("POINTS", I32, 4),
                iconst("ADD", I32, 0),
                iconst("REMOVE", I32, 1),
            ],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("ns", base(STR)),
                field("id", base(I32)),
                field("type", base(I32)),
                field("action", base(I32)),
                field("position", name("geometry_msgs/msg/Point")),
                field("scale", base(F32)),
                field("outline_color", name("std_msgs/msg/ColorRGBA")),
                field("filled", base(U8)),
                field("fill_color", name("std_msgs/msg/ColorRGBA")),
                field("lifetime", name("builtin_interfaces/msg/Duration")),
                field("points", sequence(name("geometry_msgs/msg/Point"))),
                field("outline_colors", sequence(name("std_msgs/msg/ColorRGBA"))),
            ],
        ),
        msgtype(
            "visualization_msgs/msg/InteractiveMarker",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("pose", name("geometry_msgs/msg/Pose")),
                field("name", base(STR)),
                field("description", base(STR)),
                field("scale", base(F32)),
                field("menu_entries", sequence(name("visualization_msgs/msg/MenuEntry"))),
                field(
                    "controls",
                    sequence(name("visualization_msgs/msg/InteractiveMarkerControl")),
                ),
            ],
        ),
        msgtype(
            "visualization_msgs/msg/InteractiveMarkerControl",
            vec![
                iconst("INHERIT", U8, 0),
                iconst("FIXED", U8, 1),
                iconst("VIEW_FACING", U8, 2),
                iconst("NONE", U8, 0),
                iconst("MENU", U8, 1),
                iconst("BUTTON", U8, 2),
                iconst("MOVE_AXIS", U8, 3),
                iconst("MOVE_PLANE", U8, 4),
                iconst("ROTATE_AXIS", U8, 5),
                iconst("MOVE_ROTATE", U8, 6),
                iconst("MOVE_3D", U8, 7),
                iconst("ROTATE_3D", U8, 8),
                iconst("MOVE_ROTATE_3D", U8, 9),
            ],
            vec![
                field("name", base(STR)),
                field("orientation", name("geometry_msgs/msg/Quaternion")),
                field("orientation_mode", base(U8)),
                field("interaction_mode", base(U8)),
                field("always_visible", base(BOOL)),
                field("markers", sequence(name("visualization_msgs/msg/Marker"))),
                field("independent_marker_orientation", base(BOOL)),
                field("description", base(STR)),
            ],
        ),
        msgtype(
            "visualization_msgs/msg/InteractiveMarkerFeedback",
            vec![
                iconst("KEEP_ALIVE", U8, 0),
                iconst("POSE_UPDATE", U8, 1),
                iconst("MENU_SELECT", U8, 2),
                iconst("BUTTON_CLICK", U8, 3),
                iconst("MOUSE_DOWN", U8, 4),
                iconst("MOUSE_UP", U8, 5),
            ],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("client_id", base(STR)),
                field("marker_name", base(STR)),
                field("control_name", base(STR)),
                field("event_type", base(U8)),
                field("pose", name("geometry_msgs/msg/Pose")),
                field("menu_entry_id", base(U32)),
                field("mouse_point", name("geometry_msgs/msg/Point")),
                field("mouse_point_valid", base(BOOL)),
            ],
        ),
        msgtype(
            "visualization_msgs/msg/InteractiveMarkerInit",
            vec![],
            vec![
                field("server_id", base(STR)),
                field("seq_num", base(U64)),
                field("markers", sequence(name("visualization_msgs/msg/InteractiveMarker"))),
            ],
        ),
        msgtype(
            "visualization_msgs/msg/InteractiveMarkerPose",
            vec![],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("pose", name("geometry_msgs/msg/Pose")),
                field("name", base(STR)),
            ],
        ),
        msgtype(
            "visualization_msgs/msg/InteractiveMarkerUpdate",
            vec![iconst("KEEP_ALIVE", U8, 0), iconst("UPDATE", U8, 1)],
            vec![
                field("server_id", base(STR)),
                field("seq_num", base(U64)),
                field("type", base(U8)),
                field("markers", sequence(name("visualization_msgs/msg/InteractiveMarker"))),
                field(
                    "poses",
                    sequence(name("visualization_msgs/msg/InteractiveMarkerPose")),
                ),
                field("erases", sequence(base(STR))),
            ],
        ),
        msgtype(
            "visualization_msgs/msg/Marker",
            vec![
                iconst("ARROW", I32, 0),
                iconst("CUBE", I32, 1),
                iconst("SPHERE", I32, 2),
                iconst("CYLINDER", I32, 3),
                iconst("LINE_STRIP", I32, 4),
                iconst("LINE_LIST", I32, 5),
                iconst("CUBE_LIST", I32, 6),
                iconst("SPHERE_LIST", I32, 7),
                iconst("POINTS", I32, 8),
                iconst("TEXT_VIEW_FACING", I32, 9),
                iconst("MESH_RESOURCE", I32, 10),
                iconst("TRIANGLE_LIST", I32, 11),
                iconst("ADD", I32, 0),
                iconst("MODIFY", I32, 0),
                iconst("DELETE", I32, 2),
                iconst("DELETEALL", I32, 3),
            ],
            vec![
                field("header", name("std_msgs/msg/Header")),
                field("ns", base(STR)),
                field("id", base(I32)),
                field("type", base(I32)),
                field("action", base(I32)),
                field("pose", name("geometry_msgs/msg/Pose")),
                field("scale", name("geometry_msgs/msg/Vector3")),
                field("color", name("std_msgs/msg/ColorRGBA")),
                field("lifetime", name("builtin_interfaces/msg/Duration")),
                field("frame_locked", base(BOOL)),
                field("points", sequence(name("geometry_msgs/msg/Point"))),
                field("colors", sequence(name("std_msgs/msg/ColorRGBA"))),
                field("text", base(STR)),
                field("mesh_resource", base(STR)),
                field("mesh_use_embedded_materials", base(BOOL)),
            ],
        ),
        msgtype(
            "visualization_msgs/msg/MarkerArray",
            vec![],
            vec![field("markers", sequence(name("visualization_msgs/msg/Marker")))],
        ),
        msgtype(
            "visualization_msgs/msg/MenuEntry",
            vec![
                iconst("FEEDBACK", U8, 0),
                iconst("ROSRUN", U8, 1),
                iconst("ROSLAUNCH", U8, 2),
            ],
            vec![
                field("id", base(U32)),
                field("parent_id", base(U32)),
                field("title", base(STR)),
                field("command", base(STR)),
                field("command_type", base(U8)),
            ],
        ),
    ]
}
