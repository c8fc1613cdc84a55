/*!
 * Companion media utilities around the translation engine.
 *
 * These are thin fan-out-over-subprocess helpers, external collaborators of
 * the translation pipeline proper:
 * - `audio`: extract audio tracks from video files with ffmpeg
 * - `transcribe`: dispatch audio transcription jobs across accelerator devices
 */

pub mod audio;
pub mod transcribe;
