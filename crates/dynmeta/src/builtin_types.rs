// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in type ids understood by the reflection consumer.
//!
//! Parameter and return types whose normalized name appears here are written
//! as their small integer id. Any other name is "unresolved" and goes into the
//! table as `UNRESOLVED_TYPE | string_pool_index`.
//!
//! Ids follow the consumer's static type numbering: core types below 64, gui
//! types from 64, widgets types from 121. The empty name and `void` are
//! built-in too (ids 0 and 43).

/// Id of an unnamed/unknown type.
pub const UNKNOWN_TYPE: u32 = 0;

/// Id of `void`.
pub const VOID_TYPE: u32 = 43;

/// `(name, id)` pairs, canonical names first, then aliases.
const BUILTIN_TYPES: &[(&str, u32)] = &[
    // core
    ("bool", 1),
    ("int", 2),
    ("uint", 3),
    ("qlonglong", 4),
    ("qulonglong", 5),
    ("double", 6),
    ("QChar", 7),
    ("QVariantMap", 8),
    ("QVariantList", 9),
    ("QString", 10),
    ("QStringList", 11),
    ("QByteArray", 12),
    ("QBitArray", 13),
    ("QDate", 14),
    ("QTime", 15),
    ("QDateTime", 16),
    ("QUrl", 17),
    ("QLocale", 18),
    ("QRect", 19),
    ("QRectF", 20),
    ("QSize", 21),
    ("QSizeF", 22),
    ("QLine", 23),
    ("QLineF", 24),
    ("QPoint", 25),
    ("QPointF", 26),
    ("QRegExp", 27),
    ("QVariantHash", 28),
    ("QEasingCurve", 29),
    ("QUuid", 30),
    ("void*", 31),
    ("long", 32),
    ("short", 33),
    ("char", 34),
    ("ulong", 35),
    ("ushort", 36),
    ("uchar", 37),
    ("float", 38),
    ("QObject*", 39),
    ("signed char", 40),
    ("QVariant", 41),
    ("QModelIndex", 42),
    ("void", VOID_TYPE),
    ("QRegularExpression", 44),
    ("QJsonValue", 45),
    ("QJsonObject", 46),
    ("QJsonArray", 47),
    ("QJsonDocument", 48),
    ("QByteArrayList", 49),
    ("QPersistentModelIndex", 50),
    // gui
    ("QFont", 64),
    ("QPixmap", 65),
    ("QBrush", 66),
    ("QColor", 67),
    ("QPalette", 68),
    ("QIcon", 69),
    ("QImage", 70),
    ("QPolygon", 71),
    ("QRegion", 72),
    ("QBitmap", 73),
    ("QCursor", 74),
    ("QKeySequence", 75),
    ("QPen", 76),
    ("QTextLength", 77),
    ("QTextFormat", 78),
    ("QMatrix", 79),
    ("QTransform", 80),
    ("QMatrix4x4", 81),
    ("QVector2D", 82),
    ("QVector3D", 83),
    ("QVector4D", 84),
    ("QQuaternion", 85),
    ("QPolygonF", 86),
    // widgets
    ("QSizePolicy", 121),
    // aliases
    ("qreal", 6),
    ("qint8", 40),
    ("quint8", 37),
    ("qint16", 33),
    ("quint16", 36),
    ("qint32", 2),
    ("quint32", 3),
    ("qint64", 4),
    ("quint64", 5),
    ("QList<QVariant>", 9),
    ("QMap<QString,QVariant>", 8),
    ("QHash<QString,QVariant>", 28),
    ("QList<QByteArray>", 49),
];

/// Static id for a normalized type name, or `None` if the type must be
/// referenced by name.
pub fn builtin_type_id(type_name: &str) -> Option<u32> {
    if type_name.is_empty() {
        return Some(UNKNOWN_TYPE);
    }
    BUILTIN_TYPES
        .iter()
        .find(|(name, _)| *name == type_name)
        .map(|&(_, id)| id)
}

/// Whether `type_name` is built-in.
pub fn is_builtin_type(type_name: &str) -> bool {
    builtin_type_id(type_name).is_some()
}
