//! Built-in configuration documents used when a job request names no URL.

use serde_json::{json, Value};

/// Default pipeline descriptor.
pub fn default_pipeline() -> Value {
    json!({
        "aws": {
            "s3Bucket": "vmaf-files",
            "ecsSubnet": "$ECS_SUBNET",
            "ecsSecurityGroup": "$ECS_SECURITY_GROUP",
            "ecsContainerName": "easyvmaf-s3",
            "ecsCluster": "vmaf-runner",
            "ecsTaskDefinition": "easyvmaf-s3:1",
            "mediaConvertRole": "$MEDIACONVERT_ROLE",
            "mediaConvertEndpoint": "$MEDIACONVERT_ENDPOINT"
        }
    })
}

/// Default encoding profile: single H.264 CBR rendition into an MP4 file group.
/// `$INPUT`, `$OUTPUT`, `$BITRATE`, `$WIDTH` and `$HEIGHT` are filled in per rendition by the engine.
pub fn default_encoding_profile() -> Value {
    json!({
        "Inputs": [
            {
                "TimecodeSource": "ZEROBASED",
                "VideoSelector": {},
                "FileInput": "$INPUT"
            }
        ],
        "OutputGroups": [
            {
                "Name": "File Group",
                "OutputGroupSettings": {
                    "Type": "FILE_GROUP_SETTINGS",
                    "FileGroupSettings": {
                        "Destination": "$OUTPUT"
                    }
                },
                "Outputs": [
                    {
                        "VideoDescription": {
                            "CodecSettings": {
                                "Codec": "H_264",
                                "H264Settings": {
                                    "RateControlMode": "CBR",
                                    "Bitrate": "$BITRATE",
                                    "CodecProfile": "HIGH"
                                }
                            },
                            "Width": "$WIDTH",
                            "Height": "$HEIGHT"
                        },
                        "ContainerSettings": {
                            "Container": "MP4",
                            "Mp4Settings": {}
                        }
                    }
                ]
            }
        ],
        "TimecodeConfig": {
            "Source": "ZEROBASED"
        }
    })
}
