/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use ftpcp_client::{
    FtpFileRetrieveError, FtpFileRetrieveStartError, FtpFileStoreError, FtpFileStoreStartError,
};

use crate::ProcArgs;
use crate::remote::{FtpUrl, TransferPeer, open_session};

#[derive(Debug, Error)]
pub(crate) enum CopyError {
    #[error("exactly one of source/destination must be a remote ftp url")]
    InvalidOperation,
    #[error("failed to open local file {path}: {source:?}")]
    OpenLocalFailed { path: PathBuf, source: io::Error },
    #[error("failed to create local file {path}: {source:?}")]
    CreateLocalFailed { path: PathBuf, source: io::Error },
    #[error("local read failed: {0:?}")]
    LocalReadFailed(io::Error),
    #[error("local write failed: {0:?}")]
    LocalWriteFailed(io::Error),
    #[error("data connection io failed: {0:?}")]
    DataTransferFailed(io::Error),
    #[error("session setup failed: {0}")]
    SessionSetupFailed(anyhow::Error),
    #[error("retrieve failed to start: {0}")]
    RetrieveStartFailed(#[from] FtpFileRetrieveStartError),
    #[error("retrieve was not confirmed: {0}")]
    RetrieveNotConfirmed(#[from] FtpFileRetrieveError),
    #[error("store failed to start: {0}")]
    StoreStartFailed(#[from] FtpFileStoreStartError),
    #[error("store was not confirmed: {0}")]
    StoreNotConfirmed(#[from] FtpFileStoreError),
    #[error("server ended the transfer early")]
    StoreEndedEarly,
}

#[derive(Debug, Error)]
pub(crate) enum MoveError {
    #[error(transparent)]
    Copy(#[from] CopyError),
    #[error("copy completed but source removal failed: {0}")]
    DeleteAfterCopy(anyhow::Error),
}

#[derive(Debug, Error)]
enum StreamCopyError {
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("write failed: {0:?}")]
    WriteFailed(io::Error),
}

async fn stream_copy<R, W>(reader: &mut R, writer: &mut W) -> Result<u64, StreamCopyError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; 16 * 1024];
    let mut copied = 0u64;
    loop {
        let nr = reader
            .read(&mut buf)
            .await
            .map_err(StreamCopyError::ReadFailed)?;
        if nr == 0 {
            return Ok(copied);
        }
        writer
            .write_all(&buf[..nr])
            .await
            .map_err(StreamCopyError::WriteFailed)?;
        copied += nr as u64;
    }
}

/// Copy between a local path and a remote url. Exactly one side must be
/// remote; this is checked before any socket is opened.
pub(crate) async fn copy(
    source: &TransferPeer,
    destination: &TransferPeer,
    proc_args: &ProcArgs,
) -> Result<u64, CopyError> {
    match (source, destination) {
        (TransferPeer::Local(path), TransferPeer::Remote(url)) => upload(path, url, proc_args).await,
        (TransferPeer::Remote(url), TransferPeer::Local(path)) => {
            download(url, path, proc_args).await
        }
        _ => Err(CopyError::InvalidOperation),
    }
}

/// Copy, then remove the source. The source is only ever deleted after the
/// copy was confirmed complete on the control channel; a failed removal
/// after a completed copy is reported distinctly and not rolled back.
pub(crate) async fn move_file(
    source: &TransferPeer,
    destination: &TransferPeer,
    proc_args: &ProcArgs,
) -> Result<u64, MoveError> {
    let copied = copy(source, destination, proc_args).await?;

    match source {
        TransferPeer::Local(path) => {
            fs::remove_file(path)
                .await
                .map_err(|e| MoveError::DeleteAfterCopy(e.into()))?;
        }
        TransferPeer::Remote(url) => {
            delete_remote(url, proc_args)
                .await
                .map_err(MoveError::DeleteAfterCopy)?;
        }
    }
    Ok(copied)
}

async fn download(url: &FtpUrl, path: &Path, proc_args: &ProcArgs) -> Result<u64, CopyError> {
    let mut client = open_session(url, proc_args)
        .await
        .map_err(CopyError::SessionSetupFailed)?;

    let mut data_stream = client.retrieve_file_start(&url.path).await?;
    let mut file = fs::File::create(path)
        .await
        .map_err(|e| CopyError::CreateLocalFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    let copied = stream_copy(&mut data_stream, &mut file)
        .await
        .map_err(|e| match e {
            StreamCopyError::ReadFailed(e) => CopyError::DataTransferFailed(e),
            StreamCopyError::WriteFailed(e) => CopyError::LocalWriteFailed(e),
        })?;
    drop(data_stream);

    client.wait_retrieve_end_reply().await?;

    // only a confirmed transfer reaches the local flush
    file.flush().await.map_err(CopyError::LocalWriteFailed)?;
    let _ = client.quit_and_close().await;

    log::info!("downloaded {copied} bytes from {} to {}", url.path, path.display());
    Ok(copied)
}

async fn upload(path: &Path, url: &FtpUrl, proc_args: &ProcArgs) -> Result<u64, CopyError> {
    let mut file = fs::File::open(path)
        .await
        .map_err(|e| CopyError::OpenLocalFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut client = open_session(url, proc_args)
        .await
        .map_err(CopyError::SessionSetupFailed)?;

    let mut data_stream = client.store_file_start(&url.path).await?;

    tokio::select! {
        biased;

        r = stream_copy(&mut file, &mut data_stream) => {
            let copied = r.map_err(|e| match e {
                StreamCopyError::ReadFailed(e) => CopyError::LocalReadFailed(e),
                StreamCopyError::WriteFailed(e) => CopyError::DataTransferFailed(e),
            })?;
            // close the data connection so the server sees EOF, then wait
            // for its verdict
            drop(data_stream);
            client.wait_store_end_reply().await?;
            let _ = client.quit_and_close().await;

            log::info!("uploaded {copied} bytes from {} to {}", path.display(), url.path);
            Ok(copied)
        }
        r = client.wait_control_read_ready() => {
            r.map_err(|e| CopyError::StoreNotConfirmed(FtpFileStoreError::ControlReadError(e)))?;
            // the server replied while we were still sending
            client.wait_store_end_reply().await?;
            Err(CopyError::StoreEndedEarly)
        }
    }
}

async fn delete_remote(url: &FtpUrl, proc_args: &ProcArgs) -> anyhow::Result<()> {
    let mut client = open_session(url, proc_args).await?;
    client.delete_file(&url.path).await?;
    let _ = client.quit_and_close().await;
    Ok(())
}
